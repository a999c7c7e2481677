//! The `interviewsim report` command: re-render a PDF from a JSON export.

use std::path::PathBuf;

use anyhow::Result;

use interviewsim_report::{read_json_export, write_document_export};

pub fn execute(input: PathBuf, output: PathBuf) -> Result<()> {
    let export = read_json_export(&input)?;
    write_document_export(&export.meta, &export.qa, &output)?;
    println!(
        "Wrote {} ({} questions, avg score {:.1})",
        output.display(),
        export.qa.len(),
        export.meta.avg_score
    );
    Ok(())
}
