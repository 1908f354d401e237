use sea_orm::sea_query::{Expr, SimpleExpr};

use crate::entity::products;

/// Sale price in VND: `list * (100 - discount) / 100`, truncated toward zero.
///
/// Matches the integer arithmetic of [`final_price_expr`] so filtering,
/// sorting and display agree on the same number.
pub fn final_price(list_price: i64, discount_percent: i32) -> i64 {
    list_price * (100 - i64::from(discount_percent)) / 100
}

/// SQL form of [`final_price`] over the `products` table.
pub fn final_price_expr() -> SimpleExpr {
    let remaining = Expr::val(100).sub(Expr::col((products::Entity, products::Column::Discount)));
    Expr::expr(Expr::col((products::Entity, products::Column::Price)).mul(remaining)).div(100)
}

pub fn validate_discount(discount_percent: i32) -> bool {
    (0..=100).contains(&discount_percent)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_discount_keeps_list_price() {
        assert_eq!(final_price(1_250_000, 0), 1_250_000);
    }

    #[test]
    fn ten_percent_off_a_million() {
        assert_eq!(final_price(1_000_000, 10), 900_000);
    }

    #[test]
    fn truncates_fractional_dong() {
        assert_eq!(final_price(999, 15), 849);
    }

    #[test]
    fn full_discount_is_free() {
        assert_eq!(final_price(450_000, 100), 0);
    }

    #[test]
    fn discount_bounds() {
        assert!(validate_discount(0));
        assert!(validate_discount(100));
        assert!(!validate_discount(-1));
        assert!(!validate_discount(101));
    }
}
