use anyhow::Result;

fn main() -> Result<()> {
    let code = rewire_cli::main_entry()?;
    std::process::exit(code);
}
