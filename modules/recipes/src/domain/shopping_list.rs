use std::fmt::Write as _;

use crate::contract::model::ShoppingListItem;

pub const HEADER: &str = "Shopping list:";
const SEPARATOR_WIDTH: usize = 20;

/// Render aggregated items as the downloadable plain-text document.
/// Items are written in the order given.
pub fn render(items: &[ShoppingListItem]) -> String {
    let mut out = String::with_capacity(64 + items.len() * 32);
    out.push_str(HEADER);
    out.push('\n');
    out.push_str(&"=".repeat(SEPARATOR_WIDTH));
    out.push('\n');
    for item in items {
        // Writing into a String cannot fail.
        let _ = writeln!(
            out,
            "• {} — {} {}",
            item.name, item.amount, item.measurement_unit
        );
    }
    out
}
