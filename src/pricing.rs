//! Static lesson pricing shown on the pricing page.

use crate::store::LessonType;

/// One row of the public price table.
pub struct PriceEntry {
    pub lesson_type: LessonType,
    pub title: &'static str,
    pub description: &'static str,
    /// Current price, rubles per hour.
    pub price: u32,
    /// Crossed-out previous price.
    pub old_price: u32,
    pub unit: &'static str,
}

pub const PRICES: &[PriceEntry] = &[
    PriceEntry {
        lesson_type: LessonType::IndividualOnline,
        title: "Personal lessons",
        description: "One-on-one online lessons over Zoom or WhatsApp. \
                      Full teacher attention and a flexible schedule.",
        price: 3500,
        old_price: 5000,
        unit: "rub/hour",
    },
    PriceEntry {
        lesson_type: LessonType::GroupOnline,
        title: "Group lessons",
        description: "Lively online classes in a small group of up to six \
                      students. Interactive learning and conversation practice.",
        price: 2500,
        old_price: 3500,
        unit: "rub/hour",
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prices_cover_bookable_lesson_types() {
        assert!(PRICES.iter().any(|p| p.lesson_type == LessonType::IndividualOnline));
        assert!(PRICES.iter().any(|p| p.lesson_type == LessonType::GroupOnline));
    }

    #[test]
    fn test_discounts_are_real() {
        for entry in PRICES {
            assert!(entry.old_price > entry.price, "{} is not discounted", entry.title);
        }
    }
}
