
use log::{LevelFilter, error, info};
use std::time::Instant;

use plumage::best_fit::{FitConfigBuilder, determine_best_fit};
use plumage::cli::core::{Commands, get_cli};
use plumage::cli::fit::{FitSettings, check_fit_settings};
use plumage::parsing::fit_inputs::{
    load_candidate_fits, load_observed_regions, load_somatic_variants, load_structural_variants
};
use plumage::util::json_io::save_json;
use plumage::writers::purity_writer::{write_best_fit_summary, write_purity_range};

fn run_fit(settings: FitSettings) {
    // start the timer
    let start_time = Instant::now();

    // set up logging before we check the other settings
    let filter_level: LevelFilter = match settings.verbosity {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace
    };
    env_logger::builder()
        .format_timestamp_millis()
        .filter_level(filter_level)
        .init();

    let settings = match check_fit_settings(settings) {
        Ok(s) => s,
        Err(e) => {
            error!("Error while verifying settings: {e:#}");
            std::process::exit(exitcode::CONFIG);
        }
    };

    // create the primary output folder
    info!("Creating output folder at {:?}...", settings.output_folder);
    match std::fs::create_dir_all(&settings.output_folder) {
        Ok(()) => {},
        Err(e) => {
            error!("Error while creating output folder: {e}");
            std::process::exit(exitcode::IOERR);
        }
    }

    // save the CLI options for traceability
    let settings_fn = settings.output_folder.join("fit_settings.json");
    info!("Saving CLI options to {settings_fn:?}...");
    if let Err(e) = save_json(&settings, &settings_fn) {
        error!("Error while saving CLI options: {e:#}");
        std::process::exit(exitcode::IOERR);
    }

    // load the candidate grid; this one is mandatory
    info!("Loading candidate fits...");
    let candidates = match load_candidate_fits(&settings.candidates_filename) {
        Ok(c) => c,
        Err(e) => {
            error!("Error while loading candidate fits: {e:#}");
            std::process::exit(exitcode::IOERR);
        }
    };
    info!("Loaded {} candidate fits.", candidates.len());

    // the evidence inputs are optional; a missing file just means no evidence of that kind
    let somatics = match settings.somatics_filename.as_deref() {
        Some(filename) => {
            info!("Loading somatic variants...");
            match load_somatic_variants(filename) {
                Ok(v) => v,
                Err(e) => {
                    error!("Error while loading somatic variants: {e:#}");
                    std::process::exit(exitcode::IOERR);
                }
            }
        },
        None => vec![]
    };

    let structural_variants = match settings.structural_variants_filename.as_deref() {
        Some(filename) => {
            info!("Loading structural variants...");
            match load_structural_variants(filename) {
                Ok(v) => v,
                Err(e) => {
                    error!("Error while loading structural variants: {e:#}");
                    std::process::exit(exitcode::IOERR);
                }
            }
        },
        None => vec![]
    };

    let observed_regions = match settings.regions_filename.as_deref() {
        Some(filename) => {
            info!("Loading observed regions...");
            match load_observed_regions(filename) {
                Ok(r) => r,
                Err(e) => {
                    error!("Error while loading observed regions: {e:#}");
                    std::process::exit(exitcode::IOERR);
                }
            }
        },
        None => vec![]
    };
    info!(
        "Loaded evidence: {} somatic variants, {} structural variants, {} regions.",
        somatics.len(), structural_variants.len(), observed_regions.len()
    );

    // build our configuration
    let fit_config = match FitConfigBuilder::default()
        .min_purity(settings.min_purity)
        .max_purity(settings.max_purity)
        .min_peak_variants(settings.min_peak_variants)
        .min_total_variants(settings.min_total_variants)
        .min_somatic_purity(settings.min_somatic_purity)
        .min_somatic_purity_spread(settings.min_somatic_purity_spread)
        .highly_diploid_percentage(settings.highly_diploid_percentage)
        .min_read_count(settings.min_read_count)
        .max_read_count(settings.max_read_count)
        .fit_with_somatics(!settings.disable_somatic_fit)
        .purity_bucket_size(settings.purity_bucket_size)
        .build() {
        Ok(fc) => fc,
        Err(e) => {
            error!("Error while building fit config: {e:?}");
            std::process::exit(exitcode::SOFTWARE);
        }
    };

    // run the selection
    info!("Selecting best fit for sample {:?}...", settings.sample);
    let best_fit = match determine_best_fit(
        &fit_config, &candidates, &somatics, &structural_variants, &observed_regions
    ) {
        Ok(bf) => bf,
        Err(e) => {
            error!("Error while selecting best fit: {e:#}");
            std::process::exit(exitcode::DATAERR);
        }
    };

    info!(
        "Best fit: purity = {:.4}, ploidy = {:.4}, score = {:.6}, method = {}",
        best_fit.fit().purity(), best_fit.fit().ploidy(), best_fit.fit().score(), best_fit.method()
    );

    // now write things
    let summary_fn = settings.output_folder.join(format!("{}.purity.tsv", settings.sample));
    info!("Saving fit summary to {summary_fn:?}...");
    if let Err(e) = write_best_fit_summary(&summary_fn, &settings.sample, &best_fit) {
        error!("Error while saving fit summary: {e:#}");
        std::process::exit(exitcode::IOERR);
    }

    let range_fn = settings.output_folder.join(format!("{}.purity.range.tsv", settings.sample));
    info!("Saving candidate range to {range_fn:?}...");
    if let Err(e) = write_purity_range(&range_fn, &best_fit) {
        error!("Error while saving candidate range: {e:#}");
        std::process::exit(exitcode::IOERR);
    }

    info!("Fit completed in {} seconds.", start_time.elapsed().as_secs_f64());
}

fn main() {
    let cli = get_cli();
    match cli.command {
        Commands::Fit(settings) => {
            run_fit(*settings);
        }
    }

    info!("Process finished successfully.");
}
