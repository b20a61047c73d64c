use super::{open_ledger, CmdResult};

/// Remove every key the ledger owns.
pub fn clear(yes: bool) -> CmdResult {
    if !yes {
        return Err("refusing to clear data without --yes".into());
    }
    let ledger = open_ledger()?;
    let removed = ledger.clear_all_data()?;
    println!("cleared {removed} value(s)");
    Ok(())
}
