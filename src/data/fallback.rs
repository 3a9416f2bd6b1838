//! Static fallback datasets
//!
//! Served only when upstream fails and no fresh cache entry exists. The data
//! is immutable and compiled into the binary.

use super::attractions::{Attraction, AttractionDetails, AttractionLocation, Category, PhotoLink};
use super::countries::Country;
use super::Coordinates;

/// A built-in country record
#[derive(Debug, Clone, Copy)]
pub struct FallbackCountry {
    pub name: &'static str,
    pub code: &'static str,
    pub capital: &'static str,
    pub region: &'static str,
    pub flag: &'static str,
    pub population: u64,
    pub lat: f64,
    pub lng: f64,
}

impl FallbackCountry {
    pub fn to_country(&self) -> Country {
        Country {
            name: self.name.to_string(),
            official_name: self.name.to_string(),
            code: self.code.to_string(),
            capital: self.capital.to_string(),
            region: self.region.to_string(),
            subregion: String::new(),
            population: self.population,
            flag: self.flag.to_string(),
            coordinates: Coordinates {
                lat: self.lat,
                lng: self.lng,
            },
        }
    }
}

/// Built-in country list, sorted by name
pub static FALLBACK_COUNTRIES: [FallbackCountry; 66] = [
    FallbackCountry { name: "Afghanistan", code: "AF", capital: "Kabul", region: "Asia", flag: "🇦🇫", population: 38928341, lat: 33.0, lng: 65.0 },
    FallbackCountry { name: "Albania", code: "AL", capital: "Tirana", region: "Europe", flag: "🇦🇱", population: 2877800, lat: 41.0, lng: 20.0 },
    FallbackCountry { name: "Algeria", code: "DZ", capital: "Algiers", region: "Africa", flag: "🇩🇿", population: 43851043, lat: 28.0, lng: 3.0 },
    FallbackCountry { name: "Argentina", code: "AR", capital: "Buenos Aires", region: "Americas", flag: "🇦🇷", population: 45195777, lat: -34.0, lng: -64.0 },
    FallbackCountry { name: "Australia", code: "AU", capital: "Canberra", region: "Oceania", flag: "🇦🇺", population: 25499881, lat: -27.0, lng: 133.0 },
    FallbackCountry { name: "Austria", code: "AT", capital: "Vienna", region: "Europe", flag: "🇦🇹", population: 8917205, lat: 47.33, lng: 13.33 },
    FallbackCountry { name: "Bangladesh", code: "BD", capital: "Dhaka", region: "Asia", flag: "🇧🇩", population: 164689383, lat: 24.0, lng: 90.0 },
    FallbackCountry { name: "Belgium", code: "BE", capital: "Brussels", region: "Europe", flag: "🇧🇪", population: 11589616, lat: 50.83, lng: 4.0 },
    FallbackCountry { name: "Brazil", code: "BR", capital: "Brasília", region: "Americas", flag: "🇧🇷", population: 212559409, lat: -14.24, lng: -51.93 },
    FallbackCountry { name: "Bulgaria", code: "BG", capital: "Sofia", region: "Europe", flag: "🇧🇬", population: 6948445, lat: 43.0, lng: 25.0 },
    FallbackCountry { name: "Cambodia", code: "KH", capital: "Phnom Penh", region: "Asia", flag: "🇰🇭", population: 16718971, lat: 12.0, lng: 105.0 },
    FallbackCountry { name: "Canada", code: "CA", capital: "Ottawa", region: "Americas", flag: "🇨🇦", population: 38005238, lat: 60.0, lng: -95.0 },
    FallbackCountry { name: "Chile", code: "CL", capital: "Santiago", region: "Americas", flag: "🇨🇱", population: 19116209, lat: -30.0, lng: -71.0 },
    FallbackCountry { name: "China", code: "CN", capital: "Beijing", region: "Asia", flag: "🇨🇳", population: 1439323774, lat: 35.0, lng: 105.0 },
    FallbackCountry { name: "Colombia", code: "CO", capital: "Bogotá", region: "Americas", flag: "🇨🇴", population: 50882884, lat: 4.0, lng: -72.0 },
    FallbackCountry { name: "Croatia", code: "HR", capital: "Zagreb", region: "Europe", flag: "🇭🇷", population: 4105268, lat: 45.17, lng: 15.5 },
    FallbackCountry { name: "Czech Republic", code: "CZ", capital: "Prague", region: "Europe", flag: "🇨🇿", population: 10708982, lat: 49.75, lng: 15.5 },
    FallbackCountry { name: "Denmark", code: "DK", capital: "Copenhagen", region: "Europe", flag: "🇩🇰", population: 5792203, lat: 56.0, lng: 10.0 },
    FallbackCountry { name: "Egypt", code: "EG", capital: "Cairo", region: "Africa", flag: "🇪🇬", population: 102334403, lat: 27.0, lng: 30.0 },
    FallbackCountry { name: "Estonia", code: "EE", capital: "Tallinn", region: "Europe", flag: "🇪🇪", population: 1326539, lat: 59.0, lng: 26.0 },
    FallbackCountry { name: "Finland", code: "FI", capital: "Helsinki", region: "Europe", flag: "🇫🇮", population: 5540718, lat: 64.0, lng: 26.0 },
    FallbackCountry { name: "France", code: "FR", capital: "Paris", region: "Europe", flag: "🇫🇷", population: 65273512, lat: 46.0, lng: 2.0 },
    FallbackCountry { name: "Germany", code: "DE", capital: "Berlin", region: "Europe", flag: "🇩🇪", population: 83783945, lat: 51.0, lng: 9.0 },
    FallbackCountry { name: "Greece", code: "GR", capital: "Athens", region: "Europe", flag: "🇬🇷", population: 10423056, lat: 39.0, lng: 22.0 },
    FallbackCountry { name: "Hungary", code: "HU", capital: "Budapest", region: "Europe", flag: "🇭🇺", population: 9660350, lat: 47.0, lng: 20.0 },
    FallbackCountry { name: "Iceland", code: "IS", capital: "Reykjavik", region: "Europe", flag: "🇮🇸", population: 341250, lat: 65.0, lng: -18.0 },
    FallbackCountry { name: "India", code: "IN", capital: "New Delhi", region: "Asia", flag: "🇮🇳", population: 1380004385, lat: 20.0, lng: 77.0 },
    FallbackCountry { name: "Indonesia", code: "ID", capital: "Jakarta", region: "Asia", flag: "🇮🇩", population: 273523621, lat: -5.0, lng: 120.0 },
    FallbackCountry { name: "Ireland", code: "IE", capital: "Dublin", region: "Europe", flag: "🇮🇪", population: 4994724, lat: 53.0, lng: -8.0 },
    FallbackCountry { name: "Israel", code: "IL", capital: "Jerusalem", region: "Asia", flag: "🇮🇱", population: 8655541, lat: 31.5, lng: 34.75 },
    FallbackCountry { name: "Italy", code: "IT", capital: "Rome", region: "Europe", flag: "🇮🇹", population: 60461828, lat: 41.87, lng: 12.57 },
    FallbackCountry { name: "Japan", code: "JP", capital: "Tokyo", region: "Asia", flag: "🇯🇵", population: 126476458, lat: 36.0, lng: 138.0 },
    FallbackCountry { name: "Jordan", code: "JO", capital: "Amman", region: "Asia", flag: "🇯🇴", population: 10203140, lat: 31.0, lng: 36.0 },
    FallbackCountry { name: "Kenya", code: "KE", capital: "Nairobi", region: "Africa", flag: "🇰🇪", population: 53771300, lat: -1.0, lng: 38.0 },
    FallbackCountry { name: "Latvia", code: "LV", capital: "Riga", region: "Europe", flag: "🇱🇻", population: 1886202, lat: 57.0, lng: 25.0 },
    FallbackCountry { name: "Lithuania", code: "LT", capital: "Vilnius", region: "Europe", flag: "🇱🇹", population: 2722291, lat: 56.0, lng: 24.0 },
    FallbackCountry { name: "Luxembourg", code: "LU", capital: "Luxembourg", region: "Europe", flag: "🇱🇺", population: 625976, lat: 49.75, lng: 6.17 },
    FallbackCountry { name: "Malaysia", code: "MY", capital: "Kuala Lumpur", region: "Asia", flag: "🇲🇾", population: 32365998, lat: 4.21, lng: 101.98 },
    FallbackCountry { name: "Mexico", code: "MX", capital: "Mexico City", region: "Americas", flag: "🇲🇽", population: 128932753, lat: 23.0, lng: -102.0 },
    FallbackCountry { name: "Morocco", code: "MA", capital: "Rabat", region: "Africa", flag: "🇲🇦", population: 36910558, lat: 32.0, lng: -5.0 },
    FallbackCountry { name: "Netherlands", code: "NL", capital: "Amsterdam", region: "Europe", flag: "🇳🇱", population: 17134873, lat: 52.5, lng: 5.75 },
    FallbackCountry { name: "New Zealand", code: "NZ", capital: "Wellington", region: "Oceania", flag: "🇳🇿", population: 4822233, lat: -41.0, lng: 174.0 },
    FallbackCountry { name: "Norway", code: "NO", capital: "Oslo", region: "Europe", flag: "🇳🇴", population: 5421242, lat: 62.0, lng: 10.0 },
    FallbackCountry { name: "Peru", code: "PE", capital: "Lima", region: "Americas", flag: "🇵🇪", population: 32971846, lat: -10.0, lng: -76.0 },
    FallbackCountry { name: "Philippines", code: "PH", capital: "Manila", region: "Asia", flag: "🇵🇭", population: 109581085, lat: 13.0, lng: 122.0 },
    FallbackCountry { name: "Poland", code: "PL", capital: "Warsaw", region: "Europe", flag: "🇵🇱", population: 37846605, lat: 52.0, lng: 20.0 },
    FallbackCountry { name: "Portugal", code: "PT", capital: "Lisbon", region: "Europe", flag: "🇵🇹", population: 10305564, lat: 39.5, lng: -8.0 },
    FallbackCountry { name: "Romania", code: "RO", capital: "Bucharest", region: "Europe", flag: "🇷🇴", population: 19237682, lat: 46.0, lng: 25.0 },
    FallbackCountry { name: "Russia", code: "RU", capital: "Moscow", region: "Europe", flag: "🇷🇺", population: 145939579, lat: 60.0, lng: 100.0 },
    FallbackCountry { name: "Singapore", code: "SG", capital: "Singapore", region: "Asia", flag: "🇸🇬", population: 5850343, lat: 1.29, lng: 103.85 },
    FallbackCountry { name: "Slovakia", code: "SK", capital: "Bratislava", region: "Europe", flag: "🇸🇰", population: 5459642, lat: 48.67, lng: 19.5 },
    FallbackCountry { name: "Slovenia", code: "SI", capital: "Ljubljana", region: "Europe", flag: "🇸🇮", population: 2078932, lat: 46.0, lng: 15.0 },
    FallbackCountry { name: "South Africa", code: "ZA", capital: "Cape Town", region: "Africa", flag: "🇿🇦", population: 59308690, lat: -29.0, lng: 24.0 },
    FallbackCountry { name: "South Korea", code: "KR", capital: "Seoul", region: "Asia", flag: "🇰🇷", population: 51780579, lat: 35.91, lng: 127.77 },
    FallbackCountry { name: "Spain", code: "ES", capital: "Madrid", region: "Europe", flag: "🇪🇸", population: 46754783, lat: 40.0, lng: -4.0 },
    FallbackCountry { name: "Sweden", code: "SE", capital: "Stockholm", region: "Europe", flag: "🇸🇪", population: 10102163, lat: 60.13, lng: 18.64 },
    FallbackCountry { name: "Switzerland", code: "CH", capital: "Bern", region: "Europe", flag: "🇨🇭", population: 8654618, lat: 47.17, lng: 8.52 },
    FallbackCountry { name: "Taiwan", code: "TW", capital: "Taipei", region: "Asia", flag: "🇹🇼", population: 23816775, lat: 23.5, lng: 121.0 },
    FallbackCountry { name: "Thailand", code: "TH", capital: "Bangkok", region: "Asia", flag: "🇹🇭", population: 69799978, lat: 15.87, lng: 100.99 },
    FallbackCountry { name: "Turkey", code: "TR", capital: "Ankara", region: "Asia", flag: "🇹🇷", population: 84339067, lat: 38.96, lng: 35.24 },
    FallbackCountry { name: "Ukraine", code: "UA", capital: "Kyiv", region: "Europe", flag: "🇺🇦", population: 43733759, lat: 49.0, lng: 32.0 },
    FallbackCountry { name: "United Arab Emirates", code: "AE", capital: "Abu Dhabi", region: "Asia", flag: "🇦🇪", population: 9890400, lat: 24.0, lng: 54.0 },
    FallbackCountry { name: "United Kingdom", code: "GB", capital: "London", region: "Europe", flag: "🇬🇧", population: 67886004, lat: 55.38, lng: -3.44 },
    FallbackCountry { name: "United States", code: "US", capital: "Washington D.C.", region: "Americas", flag: "🇺🇸", population: 331002647, lat: 37.09, lng: -95.71 },
    FallbackCountry { name: "Uruguay", code: "UY", capital: "Montevideo", region: "Americas", flag: "🇺🇾", population: 3473727, lat: -33.0, lng: -56.0 },
    FallbackCountry { name: "Venezuela", code: "VE", capital: "Caracas", region: "Americas", flag: "🇻🇪", population: 28435943, lat: 8.0, lng: -66.0 },
];

/// Looks up a built-in country by upper-case ISO code
pub fn fallback_country(code: &str) -> Option<Country> {
    FALLBACK_COUNTRIES
        .iter()
        .find(|country| country.code == code)
        .map(FallbackCountry::to_country)
}

/// All built-in countries, sorted by name
pub fn fallback_countries() -> Vec<Country> {
    let mut countries: Vec<Country> = FALLBACK_COUNTRIES
        .iter()
        .map(FallbackCountry::to_country)
        .collect();
    countries.sort_by(|a, b| a.name.cmp(&b.name));
    countries
}

/// A built-in sample attraction
#[derive(Debug, Clone, Copy)]
pub struct MockAttraction {
    pub id: &'static str,
    pub name: &'static str,
    pub category: &'static str,
    pub address: &'static str,
    pub lat: f64,
    pub lng: f64,
    pub rating: f64,
    pub tips: [&'static str; 2],
}

impl MockAttraction {
    fn to_attraction(self, address: &str) -> Attraction {
        Attraction {
            id: self.id.to_string(),
            name: self.name.to_string(),
            categories: vec![Category {
                id: None,
                name: self.category.to_string(),
            }],
            location: AttractionLocation {
                address: address.to_string(),
                coordinates: Coordinates {
                    lat: self.lat,
                    lng: self.lng,
                },
                ..Default::default()
            },
            rating: self.rating,
            tips: self.tips.iter().map(|tip| tip.to_string()).collect(),
            ..Default::default()
        }
    }
}

/// Sample attractions keyed by lower-case country name
static MOCK_ATTRACTIONS: [(&str, [MockAttraction; 3]); 8] = [
    (
        "australia",
        [
            MockAttraction {
                id: "mock_au_1",
                name: "Sydney Opera House",
                category: "Performing Arts Venue",
                address: "Sydney, Australia",
                lat: -33.8568,
                lng: 151.2153,
                rating: 9.5,
                tips: ["Iconic architecture", "Book tours in advance"],
            },
            MockAttraction {
                id: "mock_au_2",
                name: "Uluru",
                category: "Mountain",
                address: "Northern Territory, Australia",
                lat: -25.3444,
                lng: 131.0369,
                rating: 9.8,
                tips: ["Sacred Aboriginal site", "Best at sunrise/sunset"],
            },
            MockAttraction {
                id: "mock_au_3",
                name: "Great Barrier Reef",
                category: "Natural Feature",
                address: "Queensland, Australia",
                lat: -18.2871,
                lng: 147.6992,
                rating: 9.7,
                tips: ["World heritage site", "Great for snorkeling"],
            },
        ],
    ),
    (
        "japan",
        [
            MockAttraction {
                id: "mock_jp_1",
                name: "Tokyo Tower",
                category: "Tower",
                address: "Tokyo, Japan",
                lat: 35.6586,
                lng: 139.7454,
                rating: 8.5,
                tips: ["Great city views", "Visit at night for illumination"],
            },
            MockAttraction {
                id: "mock_jp_2",
                name: "Fushimi Inari Taisha",
                category: "Temple",
                address: "Kyoto, Japan",
                lat: 34.9671,
                lng: 135.7727,
                rating: 9.2,
                tips: ["Famous for thousands of torii gates", "Early morning visit recommended"],
            },
            MockAttraction {
                id: "mock_jp_3",
                name: "Mount Fuji",
                category: "Mountain",
                address: "Honshu, Japan",
                lat: 35.3606,
                lng: 138.7274,
                rating: 9.8,
                tips: ["Iconic symbol of Japan", "Best views from Lake Kawaguchi"],
            },
        ],
    ),
    (
        "france",
        [
            MockAttraction {
                id: "mock_fr_1",
                name: "Eiffel Tower",
                category: "Monument",
                address: "Paris, France",
                lat: 48.8584,
                lng: 2.2945,
                rating: 9.0,
                tips: ["Iconic Parisian landmark", "Beautiful at night with lights"],
            },
            MockAttraction {
                id: "mock_fr_2",
                name: "Louvre Museum",
                category: "Museum",
                address: "Paris, France",
                lat: 48.8606,
                lng: 2.3376,
                rating: 9.3,
                tips: ["Home to Mona Lisa", "Book tickets online to avoid queues"],
            },
            MockAttraction {
                id: "mock_fr_3",
                name: "Palace of Versailles",
                category: "Palace",
                address: "Versailles, France",
                lat: 48.8049,
                lng: 2.1204,
                rating: 9.1,
                tips: ["Stunning gardens", "Allow full day for visit"],
            },
        ],
    ),
    (
        "italy",
        [
            MockAttraction {
                id: "mock_it_1",
                name: "Colosseum",
                category: "Historic Site",
                address: "Rome, Italy",
                lat: 41.8902,
                lng: 12.4922,
                rating: 9.2,
                tips: ["Ancient Roman amphitheater", "Book skip-the-line tickets"],
            },
            MockAttraction {
                id: "mock_it_2",
                name: "Leaning Tower of Pisa",
                category: "Tower",
                address: "Pisa, Italy",
                lat: 43.7230,
                lng: 10.3966,
                rating: 8.7,
                tips: ["Famous tilted tower", "Climb to the top for views"],
            },
            MockAttraction {
                id: "mock_it_3",
                name: "Venice Canals",
                category: "Waterway",
                address: "Venice, Italy",
                lat: 45.4408,
                lng: 12.3155,
                rating: 9.4,
                tips: ["Romantic gondola rides", "Visit St. Marks Square"],
            },
        ],
    ),
    (
        "united kingdom",
        [
            MockAttraction {
                id: "mock_uk_1",
                name: "Big Ben",
                category: "Clock Tower",
                address: "London, UK",
                lat: 51.4994,
                lng: -0.1245,
                rating: 8.8,
                tips: ["Iconic London landmark", "Great for photos"],
            },
            MockAttraction {
                id: "mock_uk_2",
                name: "Tower Bridge",
                category: "Bridge",
                address: "London, UK",
                lat: 51.5055,
                lng: -0.0754,
                rating: 8.9,
                tips: ["Victorian Gothic bridge", "Walk across glass floor"],
            },
            MockAttraction {
                id: "mock_uk_3",
                name: "Stonehenge",
                category: "Historic Site",
                address: "Wiltshire, UK",
                lat: 51.1789,
                lng: -1.8262,
                rating: 8.5,
                tips: ["Prehistoric stone circle", "Audio guide recommended"],
            },
        ],
    ),
    (
        "spain",
        [
            MockAttraction {
                id: "mock_es_1",
                name: "Sagrada Familia",
                category: "Church",
                address: "Barcelona, Spain",
                lat: 41.4036,
                lng: 2.1744,
                rating: 9.3,
                tips: ["Gaudí masterpiece", "Book timed entry tickets"],
            },
            MockAttraction {
                id: "mock_es_2",
                name: "Alhambra",
                category: "Palace",
                address: "Granada, Spain",
                lat: 37.1773,
                lng: -3.5986,
                rating: 9.5,
                tips: ["Moorish palace complex", "Advance booking essential"],
            },
            MockAttraction {
                id: "mock_es_3",
                name: "Park Güell",
                category: "Park",
                address: "Barcelona, Spain",
                lat: 41.4145,
                lng: 2.1527,
                rating: 8.9,
                tips: ["Colorful mosaic art", "Great city views"],
            },
        ],
    ),
    (
        "germany",
        [
            MockAttraction {
                id: "mock_de_1",
                name: "Brandenburg Gate",
                category: "Monument",
                address: "Berlin, Germany",
                lat: 52.5163,
                lng: 13.3777,
                rating: 8.7,
                tips: ["Symbol of German reunification", "Free to visit"],
            },
            MockAttraction {
                id: "mock_de_2",
                name: "Neuschwanstein Castle",
                category: "Castle",
                address: "Bavaria, Germany",
                lat: 47.5576,
                lng: 10.7498,
                rating: 9.1,
                tips: ["Fairy-tale castle", "Inspired Disney castle"],
            },
            MockAttraction {
                id: "mock_de_3",
                name: "Cologne Cathedral",
                category: "Cathedral",
                address: "Cologne, Germany",
                lat: 50.9413,
                lng: 6.9583,
                rating: 8.8,
                tips: ["Gothic architecture", "Climb 533 steps to top"],
            },
        ],
    ),
    (
        "malaysia",
        [
            MockAttraction {
                id: "mock_my_1",
                name: "Petronas Twin Towers",
                category: "Skyscraper",
                address: "Kuala Lumpur, Malaysia",
                lat: 3.1579,
                lng: 101.7116,
                rating: 8.6,
                tips: ["Iconic KL landmark", "Sky bridge connects towers"],
            },
            MockAttraction {
                id: "mock_my_2",
                name: "Batu Caves",
                category: "Cave",
                address: "Selangor, Malaysia",
                lat: 3.2379,
                lng: 101.6840,
                rating: 8.3,
                tips: ["Hindu temple in limestone cave", "272 colorful steps to climb"],
            },
            MockAttraction {
                id: "mock_my_3",
                name: "George Town",
                category: "Historic District",
                address: "Penang, Malaysia",
                lat: 5.4148,
                lng: 100.3292,
                rating: 8.9,
                tips: ["UNESCO World Heritage site", "Famous street art"],
            },
        ],
    ),
];

/// Used for countries without their own sample list; the address is the country
static DEFAULT_ATTRACTIONS: [MockAttraction; 3] = [
    MockAttraction {
        id: "mock_default_1",
        name: "Local Museum",
        category: "Museum",
        address: "",
        lat: 0.0,
        lng: 0.0,
        rating: 8.0,
        tips: ["Popular local attraction", "Learn about local history"],
    },
    MockAttraction {
        id: "mock_default_2",
        name: "City Center",
        category: "Plaza",
        address: "",
        lat: 0.0,
        lng: 0.0,
        rating: 7.5,
        tips: ["Heart of the city", "Great for walking"],
    },
    MockAttraction {
        id: "mock_default_3",
        name: "Local Park",
        category: "Park",
        address: "",
        lat: 0.0,
        lng: 0.0,
        rating: 7.8,
        tips: ["Perfect for relaxation", "Family-friendly"],
    },
];

/// Sample attractions for a country name (matched case-insensitively)
pub fn mock_attractions(country: &str) -> Vec<Attraction> {
    let country = country.trim().to_lowercase();
    match MOCK_ATTRACTIONS.iter().find(|(name, _)| *name == country) {
        Some((_, attractions)) => attractions
            .iter()
            .map(|mock| mock.to_attraction(mock.address))
            .collect(),
        None => DEFAULT_ATTRACTIONS
            .iter()
            .map(|mock| mock.to_attraction(&country))
            .collect(),
    }
}

/// Placeholder details for ids starting with `mock_`
pub fn sample_details(id: &str) -> AttractionDetails {
    AttractionDetails {
        address: "Sample Address".to_string(),
        rating: 8.5,
        description: "This is a sample attraction for testing purposes.".to_string(),
        website: "https://example.com".to_string(),
        photos: vec![PhotoLink {
            url: "https://via.placeholder.com/300x200?text=Sample+Photo".to_string(),
            width: 300,
            height: 200,
        }],
        tips: vec![
            "This is a sample attraction for testing.".to_string(),
            "Great place to visit!".to_string(),
        ],
        ..placeholder_details(id, "Sample Attraction")
    }
}

/// Placeholder details when no Foursquare key is configured
pub fn key_required_details(id: &str) -> AttractionDetails {
    AttractionDetails {
        address: "API key required for details".to_string(),
        rating: 8.0,
        description: "Foursquare API key is required to load attraction details.".to_string(),
        tips: vec![
            "Add FOURSQUARE_API_KEY to .env file to get real attraction details.".to_string(),
            "Get your free API key from: https://developer.foursquare.com/".to_string(),
        ],
        ..placeholder_details(id, "Attraction Details (API Key Required)")
    }
}

/// Placeholder details when Foursquare rejects the key
pub fn invalid_key_details(id: &str) -> AttractionDetails {
    AttractionDetails {
        address: "Invalid or missing Foursquare API key".to_string(),
        description: "Please check your FOURSQUARE_API_KEY in .env file.".to_string(),
        tips: vec!["Get your free API key from: https://developer.foursquare.com/".to_string()],
        ..placeholder_details(id, "Attraction Details (Invalid API Key)")
    }
}

/// Placeholder details when Foursquare cannot be reached
pub fn unavailable_details(id: &str) -> AttractionDetails {
    AttractionDetails {
        address: "Address not available due to API error".to_string(),
        description: "Details could not be loaded at this time. This is sample data.".to_string(),
        tips: vec![
            "Details temporarily unavailable due to API error.".to_string(),
            "This is sample data for testing.".to_string(),
        ],
        ..placeholder_details(id, "Sample Attraction (Details Unavailable)")
    }
}

fn placeholder_details(id: &str, name: &str) -> AttractionDetails {
    AttractionDetails {
        id: id.to_string(),
        name: name.to_string(),
        categories: vec![Category {
            id: None,
            name: "Tourist Attraction".to_string(),
        }],
        address: String::new(),
        rating: 7.5,
        price: 0,
        description: String::new(),
        website: String::new(),
        phone: String::new(),
        email: String::new(),
        photos: Vec::new(),
        hours: None,
        tips: Vec::new(),
    }
}
