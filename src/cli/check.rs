//! Check mode: report script problems without playing

use crate::parser::check::{CheckResult, check};
use crate::types::script::ScriptDocument;
use std::io::{self, Write};

/// Validate `script` and print every finding to `out`
pub fn run_check<W: Write>(script: &ScriptDocument, out: &mut W) -> io::Result<CheckResult> {
    let result = check(script);

    for finding in &result.findings {
        writeln!(out, "{finding}")?;
    }

    let errors = result.errors().count();
    let warnings = result.warnings().count();
    if errors == 0 && warnings == 0 {
        writeln!(out, "OK: {} events, no problems found", script.len())?;
    } else {
        writeln!(out, "{errors} error(s), {warnings} warning(s)")?;
    }

    Ok(result)
}
