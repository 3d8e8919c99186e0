use crate::errors::BookingError;

/// Converts a wizard-facing 12-hour time ("2:30 PM") into the canonical
/// 24-hour storage form with seconds ("14:30:00"). Empty input stays
/// empty; anything else that is not `H:MM AM|PM` is rejected rather
/// than guessed at.
pub fn to_24_hour(input: &str) -> Result<String, BookingError> {
    if input.is_empty() {
        return Ok(String::new());
    }

    let malformed = || BookingError::InvalidTimeFormat(input.to_string());

    let (clock, meridiem) = input.split_once(' ').ok_or_else(malformed)?;
    let (hour_str, minute_str) = clock.split_once(':').ok_or_else(malformed)?;

    if hour_str.is_empty()
        || !hour_str.bytes().all(|b| b.is_ascii_digit())
        || minute_str.len() != 2
        || !minute_str.bytes().all(|b| b.is_ascii_digit())
    {
        return Err(malformed());
    }

    let hour: u32 = hour_str.parse().map_err(|_| malformed())?;
    let minute: u32 = minute_str.parse().map_err(|_| malformed())?;
    if !(1..=12).contains(&hour) || minute > 59 {
        return Err(malformed());
    }

    let hour24 = if meridiem.eq_ignore_ascii_case("AM") {
        // Midnight is 12 AM.
        if hour == 12 {
            0
        } else {
            hour
        }
    } else if meridiem.eq_ignore_ascii_case("PM") {
        if hour == 12 {
            12
        } else {
            hour + 12
        }
    } else {
        return Err(malformed());
    };

    Ok(format!("{hour24:02}:{minute:02}:00"))
}
