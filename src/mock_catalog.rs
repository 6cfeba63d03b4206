//! In-memory product source for offline runs and tests.
//!
//! Drop-in replacement for the live catalog client behind `ProductSource`.
//! Search scores the seeded records against the query and the attributes
//! the query analysis derives from it, then honors the request's sort and
//! pagination fields the way the live endpoint would.

use async_trait::async_trait;

use crate::analyze::analyze_query;
use crate::catalog::{
    CatalogPage, ProductSource, SearchRequest, SortOrder, SortStrategy, MAX_PAGE_SIZE,
};
use crate::error::{AdvisorError, AdvisorResult};
use crate::product::ProductRecord;

const DEFAULT_PAGE_SIZE: u32 = 10;

pub struct MockCatalog {
    records: Vec<ProductRecord>,
}

impl Default for MockCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl MockCatalog {
    pub fn new() -> Self {
        Self {
            records: seed_catalog(),
        }
    }

    fn score(&self, record: &ProductRecord, query: &str, attributes: &[(String, String)]) -> f64 {
        let query_lower = query.to_lowercase();
        let terms: Vec<&str> = query_lower.split_whitespace().collect();

        let name = record.name.to_lowercase();
        let category = record.category_path.to_lowercase();
        let features = record.features.join(" ").to_lowercase();
        let description = record.long_description.to_lowercase();

        let mut score = 0.0;
        for term in &terms {
            if name.contains(term) {
                score += 10.0;
            }
            if features.contains(term) {
                score += 5.0;
            }
            if description.contains(term) {
                score += 3.0;
            }
        }
        if category.contains(&query_lower) {
            score += 8.0;
        }

        for (key, value) in attributes {
            if record
                .specification(key)
                .map(|spec| spec.eq_ignore_ascii_case(value))
                .unwrap_or(false)
            {
                score += 15.0;
            }
            if features.contains(&value.to_lowercase()) {
                score += 8.0;
            }
        }

        // The rating bonus only tilts ordering between real matches; it
        // must not turn a non-match into one.
        if score > 0.0 {
            score += f64::from(record.rating) * 2.0;
        }
        score
    }
}

#[async_trait]
impl ProductSource for MockCatalog {
    async fn search(&self, request: &SearchRequest) -> AdvisorResult<CatalogPage> {
        if request.query.trim().is_empty() {
            return Err(AdvisorError::Validation(
                "search query must not be empty".to_string(),
            ));
        }

        let analysis = analyze_query(&request.query, None);
        let mut scored: Vec<(f64, &ProductRecord)> = self
            .records
            .iter()
            .map(|record| (self.score(record, &request.query, &analysis.attributes), record))
            .filter(|(score, _)| *score > 0.0)
            .collect();
        scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));

        let mut matches: Vec<ProductRecord> =
            scored.into_iter().map(|(_, record)| record.clone()).collect();
        let total_count = matches.len() as u32;

        match request.sort {
            Some(SortStrategy::Price) => {
                matches.sort_by(|a, b| {
                    let ordering = a
                        .sale_price
                        .partial_cmp(&b.sale_price)
                        .unwrap_or(std::cmp::Ordering::Equal);
                    match request.order {
                        Some(SortOrder::Descending) => ordering.reverse(),
                        _ => ordering,
                    }
                });
            }
            Some(SortStrategy::CustomerRating) => {
                matches.sort_by(|a, b| {
                    b.rating
                        .partial_cmp(&a.rating)
                        .unwrap_or(std::cmp::Ordering::Equal)
                });
            }
            Some(SortStrategy::Bestseller) => {
                matches.sort_by(|a, b| b.review_count.cmp(&a.review_count));
            }
            None => {}
        }

        let start = request.start.unwrap_or(0) as usize;
        let page_size = request
            .num_items
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .min(MAX_PAGE_SIZE) as usize;
        let records: Vec<ProductRecord> =
            matches.into_iter().skip(start).take(page_size).collect();

        Ok(CatalogPage {
            records,
            total_count,
        })
    }

    async fn find_category(&self, _query: &str) -> Option<String> {
        None
    }

    async fn trending(&self) -> AdvisorResult<CatalogPage> {
        let mut records = self.records.clone();
        records.sort_by(|a, b| b.review_count.cmp(&a.review_count));
        records.truncate(10);
        let total_count = records.len() as u32;
        Ok(CatalogPage {
            records,
            total_count,
        })
    }
}

struct Seed {
    id: &'static str,
    name: &'static str,
    brand: &'static str,
    sale_price: f64,
    original_price: f64,
    rating: f32,
    review_count: u32,
    description: &'static str,
    features: &'static [&'static str],
    specifications: &'static [(&'static str, &'static str)],
    category_path: &'static str,
    product_url: &'static str,
}

impl Seed {
    fn to_record(&self) -> ProductRecord {
        ProductRecord {
            id: self.id.to_string(),
            name: self.name.to_string(),
            brand: self.brand.to_string(),
            sale_price: self.sale_price,
            original_price: Some(self.original_price),
            rating: self.rating,
            review_count: self.review_count,
            short_description: self
                .description
                .split('.')
                .next()
                .unwrap_or(self.description)
                .to_string(),
            long_description: self.description.to_string(),
            features: self.features.iter().map(|f| f.to_string()).collect(),
            specifications: self
                .specifications
                .iter()
                .map(|(key, value)| (key.to_string(), value.to_string()))
                .collect(),
            category_path: self.category_path.to_string(),
            image_url: None,
            product_url: self.product_url.to_string(),
            in_stock: true,
        }
    }
}

fn seed_catalog() -> Vec<ProductRecord> {
    SEEDS.iter().map(Seed::to_record).collect()
}

static SEEDS: &[Seed] = &[
    Seed {
        id: "mock-laptop-1",
        name: "XPS Ultra Gaming Laptop - 16GB RAM, RTX 3070, 1TB SSD",
        brand: "XPS",
        sale_price: 1299.99,
        original_price: 1499.99,
        rating: 4.7,
        review_count: 852,
        description: "Experience ultimate gaming performance with this powerful gaming laptop featuring NVIDIA GeForce RTX 3070 graphics, 16GB RAM, and a blazing-fast 1TB NVMe SSD. The 15.6-inch 144Hz display delivers smooth gameplay and vivid visuals.",
        features: &[
            "NVIDIA GeForce RTX 3070 8GB Graphics",
            "Intel Core i7-12700H Processor (14 cores, up to 4.7GHz)",
            "16GB DDR5 RAM",
            "1TB NVMe SSD",
            "15.6-inch Full HD 144Hz Display",
            "RGB Backlit Keyboard",
            "Windows 11 Home",
        ],
        specifications: &[
            ("Processor", "Intel Core i7-12700H"),
            ("RAM", "16GB DDR5"),
            ("Storage", "1TB NVMe SSD"),
            ("Graphics", "NVIDIA GeForce RTX 3070"),
            ("Display", "15.6-inch Full HD 144Hz"),
            ("Operating System", "Windows 11 Home"),
            ("Battery Life", "Up to 6 hours"),
            ("Weight", "5.07 lbs"),
        ],
        category_path: "Computers > Gaming Laptops",
        product_url: "https://www.example.com/xps-ultra-gaming-laptop/dp/B09DP8X5F7",
    },
    Seed {
        id: "mock-laptop-2",
        name: "ProBook Business Laptop - Intel i5, 8GB RAM, 512GB SSD",
        brand: "ProBook",
        sale_price: 749.99,
        original_price: 849.99,
        rating: 4.5,
        review_count: 1243,
        description: "Stay productive with this reliable business laptop featuring an Intel Core i5 processor, 8GB RAM, and 512GB SSD. Perfect for professional use with its crystal-clear display and all-day battery life.",
        features: &[
            "Intel Core i5-1135G7 Processor",
            "8GB DDR4 RAM",
            "512GB PCIe NVMe SSD",
            "14-inch Full HD IPS Display",
            "Integrated Intel Iris Xe Graphics",
            "Windows 11 Pro",
            "Fingerprint Reader",
        ],
        specifications: &[
            ("Processor", "Intel Core i5-1135G7"),
            ("RAM", "8GB DDR4"),
            ("Storage", "512GB PCIe NVMe SSD"),
            ("Graphics", "Intel Iris Xe Graphics"),
            ("Display", "14-inch Full HD IPS"),
            ("Operating System", "Windows 11 Pro"),
            ("Battery Life", "Up to 10 hours"),
            ("Weight", "3.11 lbs"),
        ],
        category_path: "Computers > Business Laptops",
        product_url: "https://www.example.com/probook-business-laptop/dp/B08LZ9JCHF",
    },
    Seed {
        id: "mock-laptop-3",
        name: "MacBook Air M2 - 8GB RAM, 256GB SSD",
        brand: "Apple",
        sale_price: 1099.99,
        original_price: 1199.99,
        rating: 4.8,
        review_count: 3567,
        description: "Experience incredible performance with the M2 chip in the redesigned MacBook Air. Features a stunning Liquid Retina display, 8GB RAM, and 256GB SSD storage in an ultra-thin, fanless design.",
        features: &[
            "Apple M2 Chip with 8-core CPU and 8-core GPU",
            "8GB Unified Memory",
            "256GB SSD Storage",
            "13.6-inch Liquid Retina Display",
            "Two Thunderbolt Ports",
            "macOS Monterey",
            "Up to 18 hours of battery life",
        ],
        specifications: &[
            ("Processor", "Apple M2 Chip"),
            ("RAM", "8GB Unified Memory"),
            ("Storage", "256GB SSD"),
            ("Graphics", "8-core GPU"),
            ("Display", "13.6-inch Liquid Retina"),
            ("Operating System", "macOS"),
            ("Battery Life", "Up to 18 hours"),
            ("Weight", "2.7 lbs"),
        ],
        category_path: "Computers > MacBooks",
        product_url: "https://www.example.com/macbook-air-m2/dp/B0B3C5HMZ8",
    },
    Seed {
        id: "mock-laptop-4",
        name: "Budget Student Chromebook - Intel Celeron, 4GB RAM, 64GB eMMC",
        brand: "Acer",
        sale_price: 249.99,
        original_price: 299.99,
        rating: 4.2,
        review_count: 2156,
        description: "Perfect for students and everyday tasks, this affordable Chromebook offers reliable performance with its Intel Celeron processor, 4GB RAM, and 64GB eMMC storage. Access all your favorite Google apps with Chrome OS.",
        features: &[
            "Intel Celeron N4020 Processor",
            "4GB LPDDR4 RAM",
            "64GB eMMC Storage",
            "11.6-inch HD Display",
            "Chrome OS",
            "Up to 12 hours of battery life",
            "Lightweight design at 2.2 lbs",
        ],
        specifications: &[
            ("Processor", "Intel Celeron N4020"),
            ("RAM", "4GB LPDDR4"),
            ("Storage", "64GB eMMC"),
            ("Graphics", "Intel UHD Graphics 600"),
            ("Display", "11.6-inch HD"),
            ("Operating System", "Chrome OS"),
            ("Battery Life", "Up to 12 hours"),
            ("Weight", "2.2 lbs"),
        ],
        category_path: "Computers > Chromebooks",
        product_url: "https://www.example.com/budget-student-chromebook/dp/B09QRNJ48C",
    },
    Seed {
        id: "mock-phone-1",
        name: "Galaxy S23 Ultra - 256GB, 12GB RAM, 108MP Camera",
        brand: "Samsung",
        sale_price: 1199.99,
        original_price: 1299.99,
        rating: 4.7,
        review_count: 2453,
        description: "Experience the ultimate smartphone with the Galaxy S23 Ultra featuring a professional-grade camera system, S Pen support, and powerful performance with the latest processor and 12GB RAM.",
        features: &[
            "108MP Wide Camera, 12MP Ultrawide, 10MP 3x Telephoto, 10MP 10x Telephoto",
            "6.8-inch Dynamic AMOLED 2X Display with 120Hz",
            "Snapdragon 8 Gen 2 Processor",
            "12GB RAM, 256GB Storage",
            "5000mAh Battery",
            "S Pen Support",
            "Android 13 with One UI 5.1",
        ],
        specifications: &[
            ("Display", "6.8-inch Dynamic AMOLED 2X, 120Hz"),
            ("Processor", "Snapdragon 8 Gen 2"),
            ("RAM", "12GB"),
            ("Storage", "256GB"),
            ("Rear Camera", "108MP + 12MP + 10MP + 10MP"),
            ("Front Camera", "40MP"),
            ("Battery", "5000mAh"),
            ("Operating System", "Android 13"),
        ],
        category_path: "Electronics > Smartphones",
        product_url: "https://www.example.com/galaxy-s23-ultra/dp/B0BLP45GY8",
    },
    Seed {
        id: "mock-phone-2",
        name: "iPhone 14 Pro - 128GB, A16 Bionic",
        brand: "Apple",
        sale_price: 999.99,
        original_price: 999.99,
        rating: 4.8,
        review_count: 5432,
        description: "The ultimate iPhone with Dynamic Island, a 48MP Main camera, Always-On display, and A16 Bionic, the fastest chip ever in a smartphone.",
        features: &[
            "6.1-inch Super Retina XDR display with Always-On and ProMotion",
            "Dynamic Island, a magical new way to interact with iPhone",
            "48MP Main camera for up to 4x resolution",
            "Cinematic mode now in 4K Dolby Vision up to 30 fps",
            "A16 Bionic, the ultimate smartphone chip",
            "All-day battery life and up to 23 hours of video playback",
        ],
        specifications: &[
            ("Display", "6.1-inch Super Retina XDR, ProMotion"),
            ("Processor", "A16 Bionic"),
            ("Storage", "128GB"),
            ("Rear Camera", "48MP + 12MP + 12MP"),
            ("Front Camera", "12MP TrueDepth"),
            ("Battery", "Up to 23 hours video playback"),
            ("Operating System", "iOS 16"),
        ],
        category_path: "Electronics > Smartphones",
        product_url: "https://www.example.com/iphone-14-pro/dp/B0BDJH3V3X",
    },
    Seed {
        id: "mock-phone-3",
        name: "Budget Android Phone - 128GB, 48MP Camera",
        brand: "Motorola",
        sale_price: 299.99,
        original_price: 349.99,
        rating: 4.3,
        review_count: 3241,
        description: "Get amazing value with this budget-friendly Android phone featuring a 48MP camera, large battery, and plenty of storage for all your needs.",
        features: &[
            "6.5-inch LCD Display",
            "48MP Main Camera, 8MP Ultrawide, 2MP Macro",
            "MediaTek Helio G85 Processor",
            "4GB RAM, 128GB Storage (Expandable)",
            "5000mAh Battery with 18W Fast Charging",
            "Android 12",
            "Side-mounted Fingerprint Sensor",
        ],
        specifications: &[
            ("Display", "6.5-inch LCD"),
            ("Processor", "MediaTek Helio G85"),
            ("RAM", "4GB"),
            ("Storage", "128GB (Expandable)"),
            ("Rear Camera", "48MP + 8MP + 2MP"),
            ("Front Camera", "13MP"),
            ("Battery", "5000mAh"),
            ("Operating System", "Android 12"),
        ],
        category_path: "Electronics > Smartphones",
        product_url: "https://www.example.com/budget-android-phone/dp/B09SVVDQ8G",
    },
    Seed {
        id: "mock-smarthome-1",
        name: "Smart Speaker with Voice Assistant",
        brand: "Echo",
        sale_price: 99.99,
        original_price: 129.99,
        rating: 4.6,
        review_count: 7821,
        description: "Control your smart home, play music, get answers to questions, and more with this versatile smart speaker featuring advanced voice recognition technology.",
        features: &[
            "Built-in voice assistant",
            "Room-filling sound with powerful bass",
            "Control compatible smart home devices",
            "Multi-room audio capability",
            "Privacy controls with microphone off button",
            "Stream music from popular services",
        ],
        specifications: &[
            ("Connectivity", "WiFi, Bluetooth"),
            ("Dimensions", "5.7\" x 5.7\" x 4.7\""),
            ("Power", "AC power"),
            ("Speaker", "3\" woofer, dual 0.8\" tweeters"),
            ("Microphones", "Far-field array with noise reduction"),
            ("Compatibility", "Works with most smart home platforms"),
        ],
        category_path: "Smart Home > Smart Speakers",
        product_url: "https://www.example.com/smart-speaker-voice-assistant/dp/B07XJ8C8F5",
    },
    Seed {
        id: "mock-smarthome-2",
        name: "Smart Thermostat with Energy Saving Features",
        brand: "Nest",
        sale_price: 249.99,
        original_price: 279.99,
        rating: 4.7,
        review_count: 5291,
        description: "Save on energy bills while keeping your home comfortable with this intelligent thermostat that learns your schedule and preferences.",
        features: &[
            "Learns your temperature preferences",
            "Auto-schedule feature creates a personalized schedule",
            "Energy History shows how much energy you've used",
            "Remote control through smartphone app",
            "Works with multiple voice assistants",
            "Easy installation",
        ],
        specifications: &[
            ("Connectivity", "WiFi, Bluetooth"),
            ("Compatibility", "Works with most HVAC systems"),
            ("Power", "Hardwired or battery-powered"),
            ("Display", "2.1\" color LCD"),
            ("Sensors", "Temperature, humidity, occupancy, proximity"),
            ("Voice Control", "Compatible with multiple platforms"),
        ],
        category_path: "Smart Home > Climate Control",
        product_url: "https://www.example.com/smart-thermostat/dp/B08HRMHKGD",
    },
    Seed {
        id: "mock-coffee-1",
        name: "Premium Espresso Machine with Milk Frother",
        brand: "Breville",
        sale_price: 649.99,
        original_price: 799.99,
        rating: 4.6,
        review_count: 3241,
        description: "Create cafe-quality espresso drinks at home with this premium machine featuring a built-in grinder, 15-bar pressure system, and automatic milk frother.",
        features: &[
            "Built-in conical burr grinder with 13 settings",
            "15-bar Italian pump delivers optimal pressure",
            "PID temperature control for precise extraction",
            "Automatic milk frothing system",
            "Digital display with programmable settings",
            "Quick heat-up time of 3 seconds",
        ],
        specifications: &[
            ("Water Tank", "2.0L removable"),
            ("Bean Hopper", "0.5lb capacity"),
            ("Milk Frother", "Automatic with temperature control"),
            ("Power", "1600W"),
            ("Pressure", "15-bar"),
            ("Dimensions", "13.0\" x 12.5\" x 16.0\""),
            ("Materials", "Stainless steel body"),
        ],
        category_path: "Home & Kitchen > Coffee Machines",
        product_url: "https://www.example.com/premium-espresso-machine/dp/B094H8RRCF",
    },
    Seed {
        id: "mock-coffee-2",
        name: "Drip Coffee Maker with Thermal Carafe, 10-cup",
        brand: "OXO",
        sale_price: 149.99,
        original_price: 179.99,
        rating: 4.5,
        review_count: 4682,
        description: "Brew perfect coffee every time with this programmable drip coffee maker featuring a double-walled thermal carafe that keeps coffee hot for hours without burning.",
        features: &[
            "10-cup thermal carafe keeps coffee hot for hours",
            "Programmable 24-hour timer",
            "Adjustable brew strength control",
            "Shower head design for even extraction",
            "Auto-pause feature to grab a cup mid-brew",
            "Gold-tone permanent filter included",
        ],
        specifications: &[
            ("Capacity", "10 cups"),
            ("Carafe", "Double-walled stainless steel thermal"),
            ("Filter Type", "Gold-tone permanent (paper compatible)"),
            ("Program", "24-hour"),
            ("Power", "1000W"),
            ("Dimensions", "9.0\" x 7.75\" x 14.0\""),
            ("Materials", "Stainless steel and BPA-free plastic"),
        ],
        category_path: "Home & Kitchen > Coffee Machines",
        product_url: "https://www.example.com/drip-coffee-maker-thermal-carafe/dp/B096LMGYR9",
    },
    Seed {
        id: "mock-coffee-3",
        name: "Single Serve K-Cup Coffee Maker",
        brand: "Keurig",
        sale_price: 79.99,
        original_price: 99.99,
        rating: 4.3,
        review_count: 9824,
        description: "Enjoy quick, convenient coffee with this compact K-cup compatible coffee maker. Perfect for small spaces or personal use with multiple brew size options.",
        features: &[
            "Compatible with K-Cup pods or ground coffee with included adapter",
            "Multiple brew sizes: 6, 8, 10, or 12 oz",
            "One-minute brew time",
            "Removable 52 oz water reservoir",
            "Energy-saving auto shut-off",
            "Slim design fits limited counter space",
        ],
        specifications: &[
            ("Capacity", "Single serve, multiple cup sizes"),
            ("Compatibility", "K-Cup pods or ground coffee"),
            ("Water Reservoir", "52 oz removable"),
            ("Brew Time", "Under 1 minute"),
            ("Power", "1200W"),
            ("Dimensions", "5.7\" x 10.9\" x 12.5\""),
            ("Materials", "Plastic construction"),
        ],
        category_path: "Home & Kitchen > Coffee Machines",
        product_url: "https://www.example.com/single-serve-kcup-coffee-maker/dp/B07FK9TR6V",
    },
];
