use anyhow::Result;

fn main() -> Result<()> {
    code_extract::cli::run()
}
