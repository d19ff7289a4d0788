//! Print the OpenAPI document as YAML.

use std::io::Write as _;

use codelibrary::ApiDoc;
use color_eyre::eyre::Result;
use utoipa::OpenApi;

fn main() -> Result<()> {
    color_eyre::install()?;
    let yaml = ApiDoc::openapi().to_yaml()?;
    std::io::stdout().write_all(yaml.as_bytes())?;
    Ok(())
}
