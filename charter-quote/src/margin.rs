/// Percentages applied on top of the cost subtotal.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Adjustments {
    pub discount_percentage: f64,
    pub margin_percentage: f64,
    pub tax_rate: f64,
}

/// Every intermediate of the margin, discount and tax stage.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Totals {
    pub subtotal: f64,
    pub discount_percentage: f64,
    pub discount_amount: f64,
    pub discounted_subtotal: f64,
    pub margin_percentage: f64,
    pub margin_amount: f64,
    pub tax_rate: f64,
    pub tax_amount: f64,
    pub total_cost: f64,
}

/// Discount the cost subtotal, add margin on the discounted base, then tax
/// the post-margin amount.
pub fn apply(subtotal: f64, adjustments: &Adjustments) -> Totals {
    let discount_amount = subtotal * adjustments.discount_percentage / 100.0;
    let discounted_subtotal = subtotal - discount_amount;
    let margin_amount = discounted_subtotal * adjustments.margin_percentage / 100.0;
    let tax_amount = (discounted_subtotal + margin_amount) * adjustments.tax_rate / 100.0;
    let total_cost = discounted_subtotal + margin_amount + tax_amount;

    Totals {
        subtotal,
        discount_percentage: adjustments.discount_percentage,
        discount_amount,
        discounted_subtotal,
        margin_percentage: adjustments.margin_percentage,
        margin_amount,
        tax_rate: adjustments.tax_rate,
        tax_amount,
        total_cost,
    }
}
