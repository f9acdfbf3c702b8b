use furqaan_search_core::runtime::{self, RunOutcome};

fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let options = match runtime::parse_cli_args(&args) {
        Ok(options) => options,
        Err(error) => error.exit(),
    };

    match runtime::run_with_options(options) {
        Ok(RunOutcome::Completed) => {}
        Ok(RunOutcome::SearchFailed) => std::process::exit(1),
        Err(error) => {
            log::error!("runtime failed: {error}");
            eprintln!("[furqaan-search] runtime failed: {error}");
            std::process::exit(1);
        }
    }
}
