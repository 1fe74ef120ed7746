//! Convert command - Re-express an amount in another unit

use satsplit_types::{convert, Denomination};

/// Print `amount` (given in `from`) expressed in `to`
pub fn run_convert(amount: &str, from: Denomination, to: Denomination, json: bool) -> anyhow::Result<()> {
    let converted = convert(amount, from, to)?;
    if json {
        println!(
            "{}",
            serde_json::json!({ "input": amount, "from": from, "to": to, "value": converted })
        );
    } else {
        println!("{converted} {}", to.label());
    }
    Ok(())
}
