use schemars::schema_for;
use tg_core::sheet::WeekSheet;

use crate::cli::GlobalFlags;
use crate::output::output;

/// Handle `tg schema`: the JSON schema accepted by `tg book --file`.
pub fn handle(flags: &GlobalFlags) -> anyhow::Result<()> {
    output(&schema_for!(WeekSheet), flags.format)
}
