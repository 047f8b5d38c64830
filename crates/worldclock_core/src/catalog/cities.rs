//! Static city table. Not user-editable.

use super::City;

const fn city(city: &'static str, country: &'static str, timezone: &'static str) -> City {
    City {
        city,
        country,
        timezone,
    }
}

pub(super) const CITIES: &[City] = &[
    city("New York", "United States", "America/New_York"),
    city("Los Angeles", "United States", "America/Los_Angeles"),
    city("Chicago", "United States", "America/Chicago"),
    city("Denver", "United States", "America/Denver"),
    city("Phoenix", "United States", "America/Phoenix"),
    city("Anchorage", "United States", "America/Anchorage"),
    city("Honolulu", "United States", "Pacific/Honolulu"),
    city("Toronto", "Canada", "America/Toronto"),
    city("Vancouver", "Canada", "America/Vancouver"),
    city("St. John's", "Canada", "America/St_Johns"),
    city("Mexico City", "Mexico", "America/Mexico_City"),
    city("Sao Paulo", "Brazil", "America/Sao_Paulo"),
    city("Buenos Aires", "Argentina", "America/Argentina/Buenos_Aires"),
    city("Santiago", "Chile", "America/Santiago"),
    city("Bogota", "Colombia", "America/Bogota"),
    city("Lima", "Peru", "America/Lima"),
    city("London", "United Kingdom", "Europe/London"),
    city("Dublin", "Ireland", "Europe/Dublin"),
    city("Lisbon", "Portugal", "Europe/Lisbon"),
    city("Paris", "France", "Europe/Paris"),
    city("Berlin", "Germany", "Europe/Berlin"),
    city("Madrid", "Spain", "Europe/Madrid"),
    city("Rome", "Italy", "Europe/Rome"),
    city("Amsterdam", "Netherlands", "Europe/Amsterdam"),
    city("Stockholm", "Sweden", "Europe/Stockholm"),
    city("Athens", "Greece", "Europe/Athens"),
    city("Istanbul", "Turkey", "Europe/Istanbul"),
    city("Moscow", "Russia", "Europe/Moscow"),
    city("Cairo", "Egypt", "Africa/Cairo"),
    city("Lagos", "Nigeria", "Africa/Lagos"),
    city("Nairobi", "Kenya", "Africa/Nairobi"),
    city("Johannesburg", "South Africa", "Africa/Johannesburg"),
    city("Dubai", "United Arab Emirates", "Asia/Dubai"),
    city("Tehran", "Iran", "Asia/Tehran"),
    city("Karachi", "Pakistan", "Asia/Karachi"),
    city("Mumbai", "India", "Asia/Kolkata"),
    city("New Delhi", "India", "Asia/Kolkata"),
    city("Kathmandu", "Nepal", "Asia/Kathmandu"),
    city("Dhaka", "Bangladesh", "Asia/Dhaka"),
    city("Bangkok", "Thailand", "Asia/Bangkok"),
    city("Jakarta", "Indonesia", "Asia/Jakarta"),
    city("Singapore", "Singapore", "Asia/Singapore"),
    city("Hong Kong", "China", "Asia/Hong_Kong"),
    city("Shanghai", "China", "Asia/Shanghai"),
    city("Beijing", "China", "Asia/Shanghai"),
    city("Seoul", "South Korea", "Asia/Seoul"),
    city("Tokyo", "Japan", "Asia/Tokyo"),
    city("Manila", "Philippines", "Asia/Manila"),
    city("Perth", "Australia", "Australia/Perth"),
    city("Adelaide", "Australia", "Australia/Adelaide"),
    city("Sydney", "Australia", "Australia/Sydney"),
    city("Melbourne", "Australia", "Australia/Melbourne"),
    city("Auckland", "New Zealand", "Pacific/Auckland"),
    city("Chatham Islands", "New Zealand", "Pacific/Chatham"),
    city("Fiji", "Fiji", "Pacific/Fiji"),
    city("Kiritimati", "Kiribati", "Pacific/Kiritimati"),
    city("Pago Pago", "American Samoa", "Pacific/Pago_Pago"),
    city("Reykjavik", "Iceland", "Atlantic/Reykjavik"),
];
