use std::collections::BTreeMap;

use serde::Serialize;

use crate::errors::BookingError;
use crate::models::{AddOn, Package};

/// The add-on that extends the event window instead of being capped by it.
pub const ADDITIONAL_HOUR_ADDON_ID: i64 = 9;
/// Setup labor is capped at two hours no matter how long the event runs.
pub const EARLY_SETUP_ADDON_ID: i64 = 6;
pub const EARLY_SETUP_MAX_HOURS: i64 = 2;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    pub addon_id: i64,
    pub requested: i64,
    pub max_allowed: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct Quote {
    pub subtotal: i64,
    pub total_amount: i64,
    pub total_event_hours: i64,
    pub violations: Vec<Violation>,
}

/// Prices a package plus add-on selection against the authoritative
/// catalog and checks hourly quantities against the event window.
///
/// Unknown add-on ids and add-ons not offered for the selected package
/// are dropped without error: a stale or hostile client can neither
/// inject cost nor trip a violation with them. Quantities at or below
/// zero count as "not selected".
pub fn price_booking(
    packages: &[Package],
    addons: &[AddOn],
    package_id: i64,
    quantities: &BTreeMap<i64, i64>,
) -> Result<Quote, BookingError> {
    let package = packages
        .iter()
        .find(|p| p.id == package_id)
        .ok_or(BookingError::InvalidPackage(package_id))?;

    let additional_hours = quantities
        .get(&ADDITIONAL_HOUR_ADDON_ID)
        .copied()
        .filter(|q| *q > 0)
        .unwrap_or(0);
    let total_event_hours = package.duration_hours + additional_hours;

    let mut addon_total = 0i64;
    let mut violations = Vec::new();

    for (&addon_id, &quantity) in quantities {
        if quantity <= 0 {
            continue;
        }
        let Some(addon) = addons.iter().find(|a| a.id == addon_id) else {
            continue;
        };
        if !addon.available_for(package.id) {
            continue;
        }

        // Hourly add-ons charge per requested hour; the package duration
        // caps them but never multiplies into the price.
        addon_total += addon.price * quantity;

        if addon.is_hourly && addon_id != ADDITIONAL_HOUR_ADDON_ID {
            let max_allowed = if addon_id == EARLY_SETUP_ADDON_ID {
                EARLY_SETUP_MAX_HOURS.min(total_event_hours)
            } else {
                total_event_hours
            };
            if quantity > max_allowed {
                violations.push(Violation {
                    addon_id,
                    requested: quantity,
                    max_allowed,
                });
            }
        }
    }

    Ok(Quote {
        subtotal: package.price,
        total_amount: package.price + addon_total,
        total_event_hours,
        violations,
    })
}
