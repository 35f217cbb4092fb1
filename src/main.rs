use apidiff_md::commands;
use apidiff_md::core::errors::ApiDiffError;

fn main() {
    if let Err(err) = commands::main() {
        eprintln!("Error: {:#}", err);
        let code = err
            .chain()
            .find_map(|e| e.downcast_ref::<ApiDiffError>())
            .map_or(1, ApiDiffError::exit_code);
        std::process::exit(code);
    }
}
