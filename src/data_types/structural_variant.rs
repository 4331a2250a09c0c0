
use serde::Serialize;

/// One end of a structural variant junction
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
pub struct Breakend {
    /// Tumor fragments supporting the junction at this end; None when the caller did not report it
    tumor_fragment_count: Option<u32>
}

impl Breakend {
    /// Constructor
    pub fn new(tumor_fragment_count: Option<u32>) -> Breakend {
        Breakend {
            tumor_fragment_count
        }
    }

    pub fn tumor_fragment_count(&self) -> Option<u32> {
        self.tumor_fragment_count
    }
}

/// The subset view of a structural variant call that the fit logic consumes.
/// Single-breakend events have `end = None`.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct StructuralVariant {
    /// True if the call failed upstream filters
    is_filtered: bool,
    /// True if the junction matches a known cancer hotspot
    is_hotspot: bool,
    /// The lower breakend, always present
    start: Breakend,
    /// The upper breakend; absent for single-breakend events
    end: Option<Breakend>
}

impl StructuralVariant {
    /// Constructor
    /// # Arguments
    /// * `is_filtered` - upstream filter status
    /// * `is_hotspot` - known cancer hotspot flag
    /// * `start` - the lower breakend
    /// * `end` - the upper breakend, if the event has one
    pub fn new(is_filtered: bool, is_hotspot: bool, start: Breakend, end: Option<Breakend>) -> StructuralVariant {
        StructuralVariant {
            is_filtered,
            is_hotspot,
            start,
            end
        }
    }

    // getters
    pub fn is_filtered(&self) -> bool {
        self.is_filtered
    }

    pub fn is_hotspot(&self) -> bool {
        self.is_hotspot
    }

    pub fn start(&self) -> &Breakend {
        &self.start
    }

    pub fn end(&self) -> Option<&Breakend> {
        self.end.as_ref()
    }
}
