//! Deterministic fixture data for fixture mode and live-mode fallback.
//!
//! The catalog itself is fixed; carts, reviews, orders, and tracking
//! histories are synthesized on each call with timestamps relative to
//! `Utc::now()`, so nothing here persists between calls.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};

use paperback_core::{
    AddressId, BookId, OrderId, OrderStatus, PaymentIntentId, PaymentStatus, Price, ReviewId,
    TrackingNumber, UserId,
};

use super::types::{
    Address, Book, Cart, CartItem, CouponValidation, EstimatedDays, LoginResponse, Order,
    OrderLine, Paginated, PaymentConfirmation, PaymentIntent, PriceQuote, RatingSummary, Review,
    Shipment, ShippingQuote, TrackingEvent, TrackingInfo, UserPreferences, UserProfile,
};

/// Coupon codes the fixture pricing service accepts.
pub const VALID_COUPONS: &[&str] = &["SAVE10", "WELCOME", "BOOKWORM"];

/// Flat discount applied by a fixture quote when any coupon is supplied.
const QUOTE_COUPON_DISCOUNT_CENTS: i64 = 500;

static CATALOG: LazyLock<Vec<Book>> = LazyLock::new(build_catalog);

/// The fixture catalog: 12 books across six categories.
pub fn catalog() -> &'static [Book] {
    &CATALOG
}

#[allow(clippy::too_many_arguments)]
fn book(
    id: &str,
    title: &str,
    author: &str,
    description: &str,
    price_cents: i64,
    category: &str,
    rating: f32,
    review_count: u32,
    stock_count: u32,
    isbn: Option<&str>,
    publisher: Option<&str>,
    published_date: Option<DateTime<Utc>>,
    tags: &[&str],
) -> Book {
    Book {
        id: BookId::new(id),
        title: title.to_owned(),
        author: author.to_owned(),
        description: description.to_owned(),
        price: Price::from_cents(price_cents),
        category: category.to_owned(),
        cover_image: format!("/covers/{id}.jpg"),
        rating,
        review_count,
        in_stock: stock_count > 0,
        stock_count,
        isbn: isbn.map(str::to_owned),
        publisher: publisher.map(str::to_owned),
        published_date,
        tags: if tags.is_empty() {
            None
        } else {
            Some(tags.iter().map(|&t| t.to_owned()).collect())
        },
    }
}

fn published(year: i32, month: u32, day: u32) -> Option<DateTime<Utc>> {
    NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| Utc.from_utc_datetime(&dt))
}

fn build_catalog() -> Vec<Book> {
    vec![
        book(
            "1",
            "The Lighthouse at Dunmore Head",
            "Niamh Gallagher",
            "Three generations of keepers tend a light that refuses to go out.",
            1899,
            "Fiction",
            4.6,
            214,
            14,
            Some("978-1-4028-9462-1"),
            Some("Harbour Lane Press"),
            published(2021, 3, 9),
            &["literary", "family saga"],
        ),
        book(
            "2",
            "Orbital Decay",
            "Marcus Chen",
            "A salvage crew races the slow fall of a derelict habitat ring.",
            2499,
            "Science Fiction",
            4.2,
            167,
            8,
            Some("978-0-5530-2925-7"),
            Some("Perihelion Books"),
            published(2023, 6, 21),
            &["hard sf", "space"],
        ),
        book(
            "3",
            "A Quiet Word with the Dead",
            "Imogen Hartley",
            "A village archivist finds a confession filed forty years too late.",
            1450,
            "Mystery",
            4.8,
            389,
            23,
            Some("978-0-3995-9049-3"),
            Some("Wrenfield & Co"),
            published(2019, 10, 3),
            &["cozy", "village"],
        ),
        book(
            "4",
            "The Tidy Ledger",
            "Dana Okafor",
            "Personal finance without fear, one envelope at a time.",
            2100,
            "Non-Fiction",
            3.9,
            98,
            5,
            Some("978-1-9821-3746-5"),
            Some("Foldline"),
            published(2020, 1, 15),
            &["finance", "self-help"],
        ),
        book(
            "5",
            "The Ember Court",
            "Rosalind Vane",
            "An exiled cartwright is summoned to rebuild a palace of cinders.",
            1999,
            "Fantasy",
            4.4,
            276,
            0,
            Some("978-0-7653-8820-4"),
            Some("Gloaming House"),
            published(2022, 9, 1),
            &["epic", "court intrigue"],
        ),
        book(
            "6",
            "Letters from the Allotment",
            "Tom Brierley",
            "A year of soil, slugs, and unreasonable optimism.",
            1299,
            "Non-Fiction",
            4.1,
            57,
            31,
            None,
            Some("Foldline"),
            None,
            &["gardening", "essays"],
        ),
        book(
            "7",
            "Summer at Foxglove Farm",
            "Elise Moreau",
            "She came for the harvest. She stayed for the beekeeper.",
            999,
            "Romance",
            3.7,
            143,
            42,
            Some("978-0-4514-9822-0"),
            None,
            published(2024, 5, 12),
            &[],
        ),
        book(
            "8",
            "The Cartographer's Apprentice",
            "Jonas Weir",
            "Every map he copies changes something in the territory.",
            1675,
            "Fiction",
            4.9,
            512,
            2,
            Some("978-1-5011-7321-9"),
            Some("Harbour Lane Press"),
            published(2018, 4, 27),
            &["magical realism"],
        ),
        book(
            "9",
            "Cold Harbour",
            "Freya Lindqvist",
            "A frozen port, a missing pilot boat, and nobody saw a thing.",
            1725,
            "Mystery",
            4.0,
            201,
            0,
            Some("978-0-0626-9189-2"),
            Some("Wrenfield & Co"),
            published(2023, 11, 8),
            &["nordic", "noir"],
        ),
        book(
            "10",
            "The Last Signal from Calypso Deep",
            "Marcus Chen",
            "The trench station went quiet. The relief crew wishes it had stayed that way.",
            2250,
            "Science Fiction",
            3.5,
            74,
            11,
            Some("978-0-5530-2981-3"),
            Some("Perihelion Books"),
            published(2025, 2, 18),
            &["deep sea", "thriller"],
        ),
        book(
            "11",
            "Hedgerow Remedies",
            "Tom Brierley",
            "Field notes on what grows in the margins and what it is good for.",
            1500,
            "Non-Fiction",
            4.3,
            122,
            9,
            Some("978-1-7710-0457-8"),
            Some("Foldline"),
            published(2016, 8, 30),
            &["nature", "foraging"],
        ),
        book(
            "12",
            "The Glass Orchard",
            "Niamh Gallagher",
            "In a greenhouse town, every family keeps one tree under glass.",
            1349,
            "Fiction",
            4.7,
            331,
            18,
            Some("978-1-4028-9511-6"),
            Some("Harbour Lane Press"),
            published(2022, 2, 14),
            &["literary"],
        ),
    ]
}

// =============================================================================
// Catalog helpers
// =============================================================================

/// Slice `items` into a 1-indexed page.
///
/// `has_more` is true iff `page * limit < total`.
pub fn paginate<T: Clone>(items: &[T], page: u32, limit: u32) -> Paginated<T> {
    let total = items.len();
    let start = (page.saturating_sub(1) as usize).saturating_mul(limit as usize);
    let data = items
        .iter()
        .skip(start)
        .take(limit as usize)
        .cloned()
        .collect();

    Paginated {
        data,
        total,
        page,
        limit,
        has_more: (page as usize).saturating_mul(limit as usize) < total,
    }
}

/// Page through the fixture catalog.
pub fn page_books(page: u32, limit: u32) -> Paginated<Book> {
    paginate(catalog(), page, limit)
}

/// Case-insensitive substring match against title and author.
pub fn search_books(query: &str) -> Vec<Book> {
    let needle = query.to_lowercase();
    catalog()
        .iter()
        .filter(|b| {
            b.title.to_lowercase().contains(&needle) || b.author.to_lowercase().contains(&needle)
        })
        .cloned()
        .collect()
}

/// All fixture books in a category (exact match).
pub fn books_by_category(category: &str) -> Vec<Book> {
    catalog()
        .iter()
        .filter(|b| b.category == category)
        .cloned()
        .collect()
}

/// Look up a fixture book by id.
pub fn book_by_id(id: &BookId) -> Option<Book> {
    catalog().iter().find(|b| &b.id == id).cloned()
}

/// The first `count` fixture books, used for recommendation lists.
pub fn recommended_books(count: usize) -> Vec<Book> {
    catalog().iter().take(count).cloned().collect()
}

/// The demo wishlist: ids of the first four fixture books.
pub fn demo_wishlist() -> Vec<BookId> {
    catalog().iter().take(4).map(|b| b.id.clone()).collect()
}

// =============================================================================
// Cart
// =============================================================================

/// A demo cart: the first three catalog books with quantities 1..=3.
pub fn demo_cart(user_id: &UserId) -> Cart {
    let now = Utc::now();
    let items: Vec<CartItem> = catalog()
        .iter()
        .take(3)
        .enumerate()
        .map(|(idx, book)| {
            #[allow(clippy::cast_possible_truncation)]
            let quantity = idx as u32 + 1;
            CartItem {
                book_id: book.id.clone(),
                book: book.clone(),
                quantity,
                price: book.price,
                subtotal: book.price.times(quantity),
            }
        })
        .collect();

    let total_items = items.iter().map(|i| i.quantity).sum();
    let total_price = items
        .iter()
        .fold(Price::ZERO, |acc, item| acc + item.subtotal);

    Cart {
        user_id: user_id.clone(),
        items,
        total_items,
        total_price,
        created_at: now,
        updated_at: now,
    }
}

/// An empty cart, the neutral fallback when the cart endpoint is down.
pub fn empty_cart(user_id: &UserId) -> Cart {
    let now = Utc::now();
    Cart {
        user_id: user_id.clone(),
        items: Vec::new(),
        total_items: 0,
        total_price: Price::ZERO,
        created_at: now,
        updated_at: now,
    }
}

// =============================================================================
// Reviews & ratings
// =============================================================================

/// Three canned reviews attributed to the given book.
pub fn demo_reviews(book_id: &BookId) -> Vec<Review> {
    let entries: [(&str, &str, u8, &str, bool, u32, i64); 3] = [
        (
            "1",
            "John Smith",
            5,
            "Absolutely loved this book! Could not put it down.",
            true,
            12,
            7,
        ),
        (
            "2",
            "Sarah Johnson",
            4,
            "Great read with compelling characters. Highly recommend!",
            true,
            8,
            14,
        ),
        (
            "3",
            "Michael Chen",
            5,
            "One of the best books I have read this year. The writing is superb!",
            false,
            5,
            21,
        ),
    ];

    entries
        .into_iter()
        .map(
            |(id, name, rating, text, verified, helpful, days_ago)| Review {
                id: ReviewId::new(id),
                book_id: book_id.clone(),
                user_id: UserId::new(format!("user{id}")),
                user_name: name.to_owned(),
                rating,
                text: text.to_owned(),
                verified_purchase: verified,
                created_at: Utc::now() - Duration::days(days_ago),
                helpful,
            },
        )
        .collect()
}

/// Canned aggregate rating for a book.
pub fn demo_rating(book_id: &BookId) -> RatingSummary {
    RatingSummary {
        book_id: book_id.clone(),
        average_rating: 4.5,
        total_ratings: 127,
        distribution: BTreeMap::from([(5, 80), (4, 30), (3, 12), (2, 3), (1, 2)]),
    }
}

/// The neutral rating returned when the ratings endpoint is down.
pub fn neutral_rating(book_id: &BookId) -> RatingSummary {
    RatingSummary {
        book_id: book_id.clone(),
        average_rating: 0.0,
        total_ratings: 0,
        distribution: BTreeMap::new(),
    }
}

// =============================================================================
// Pricing
// =============================================================================

/// Quote `qty` copies of a fixture book, with a flat discount for any coupon.
pub fn demo_quote(book_id: &BookId, qty: u32, coupon: Option<&str>) -> PriceQuote {
    let unit = book_by_id(book_id).map_or(Price::ZERO, |b| b.price);
    let price = unit.times(qty);
    let discount = if coupon.is_some() {
        Price::from_cents(QUOTE_COUPON_DISCOUNT_CENTS)
    } else {
        Price::ZERO
    };
    PriceQuote {
        price,
        discount,
        total: Price::new(price.amount() - discount.amount()),
    }
}

/// The neutral quote returned when the pricing endpoint is down.
pub fn neutral_quote() -> PriceQuote {
    PriceQuote {
        price: Price::ZERO,
        discount: Price::ZERO,
        total: Price::ZERO,
    }
}

/// Validate a coupon against the fixture allow-list (exact match).
pub fn validate_coupon(code: &str) -> CouponValidation {
    let valid = VALID_COUPONS.contains(&code);
    CouponValidation {
        valid,
        discount_amount: if valid {
            Price::from_cents(1000)
        } else {
            Price::ZERO
        },
        discount_percent: if valid { 10 } else { 0 },
    }
}

/// The neutral validation returned when the coupon endpoint is down.
pub fn invalid_coupon() -> CouponValidation {
    CouponValidation {
        valid: false,
        discount_amount: Price::ZERO,
        discount_percent: 0,
    }
}

// =============================================================================
// Payments
// =============================================================================

/// Synthesize a pending payment intent.
pub fn demo_payment_intent(order_id: &OrderId, amount: Price, currency: &str) -> PaymentIntent {
    PaymentIntent {
        id: PaymentIntentId::new(format!("pi_{}", Utc::now().timestamp_millis())),
        order_id: order_id.clone(),
        amount,
        currency: currency.to_owned(),
        status: PaymentStatus::Pending,
    }
}

/// Synthesize a completed confirmation for an intent.
pub fn demo_payment_confirmation(intent_id: &PaymentIntentId) -> PaymentConfirmation {
    PaymentConfirmation {
        intent_id: intent_id.clone(),
        status: PaymentStatus::Completed,
    }
}

/// Synthesize a completed payment record for a lookup.
pub fn demo_payment(payment_id: &PaymentIntentId) -> PaymentIntent {
    PaymentIntent {
        id: payment_id.clone(),
        order_id: OrderId::new("ORD001"),
        amount: Price::from_cents(3349),
        currency: "USD".to_owned(),
        status: PaymentStatus::Completed,
    }
}

// =============================================================================
// Shipping
// =============================================================================

/// The fixture rate card; also the fallback when the quote endpoint is down.
pub fn shipping_rate_card() -> ShippingQuote {
    ShippingQuote {
        standard_shipping: Price::from_cents(599),
        express_shipping: Price::from_cents(1599),
        estimated_days: EstimatedDays {
            standard: "5-7 business days".to_owned(),
            express: "2-3 business days".to_owned(),
        },
    }
}

/// Synthesize a shipment with a timestamp-derived tracking number.
pub fn demo_shipment() -> Shipment {
    Shipment {
        tracking_number: TrackingNumber::new(format!("TRK{}", Utc::now().timestamp_millis())),
        carrier: "USPS".to_owned(),
        estimated_delivery: Utc::now() + Duration::days(7),
    }
}

/// Synthesize an in-transit tracking history for a tracking number.
pub fn demo_tracking(tracking_number: &TrackingNumber) -> TrackingInfo {
    let now = Utc::now();
    TrackingInfo {
        tracking_number: tracking_number.clone(),
        status: "In Transit".to_owned(),
        carrier: "USPS".to_owned(),
        estimated_delivery: now + Duration::days(3),
        events: vec![
            TrackingEvent {
                status: "Package received by carrier".to_owned(),
                location: "San Francisco, CA".to_owned(),
                timestamp: now - Duration::days(2),
            },
            TrackingEvent {
                status: "In transit".to_owned(),
                location: "Los Angeles, CA".to_owned(),
                timestamp: now - Duration::days(1),
            },
            TrackingEvent {
                status: "Out for delivery".to_owned(),
                location: "Huntington Beach, CA".to_owned(),
                timestamp: now,
            },
        ],
    }
}

// =============================================================================
// Orders
// =============================================================================

/// Sales-tax factor applied to fixture order totals.
fn with_tax(subtotal: Price) -> Price {
    Price::new(subtotal.amount() * rust_decimal::Decimal::new(113, 2))
}

fn demo_address() -> Address {
    Address {
        id: AddressId::new("1"),
        street: "123 Main St".to_owned(),
        city: "Huntington Beach".to_owned(),
        state: "CA".to_owned(),
        postal_code: "92648".to_owned(),
        country: "United States".to_owned(),
        is_default: true,
    }
}

fn order_lines(books: &[Book], quantity: u32) -> Vec<OrderLine> {
    books
        .iter()
        .map(|book| OrderLine {
            book_id: book.id.clone(),
            title: book.title.clone(),
            quantity,
            price: book.price,
        })
        .collect()
}

fn lines_subtotal(lines: &[OrderLine]) -> Price {
    lines
        .iter()
        .fold(Price::ZERO, |acc, line| acc + line.price.times(line.quantity))
}

/// A single synthesized order: the first three books, quantities 1..=3.
pub fn demo_order(order_id: &OrderId) -> Order {
    let now = Utc::now();
    let items: Vec<OrderLine> = catalog()
        .iter()
        .take(3)
        .enumerate()
        .map(|(idx, book)| {
            #[allow(clippy::cast_possible_truncation)]
            let quantity = idx as u32 + 1;
            OrderLine {
                book_id: book.id.clone(),
                title: book.title.clone(),
                quantity,
                price: book.price,
            }
        })
        .collect();
    let total_amount = lines_subtotal(&items);

    Order {
        id: order_id.clone(),
        user_id: UserId::new("user-123"),
        items,
        total_amount,
        status: OrderStatus::Shipped,
        payment_status: PaymentStatus::Completed,
        shipping_address: demo_address(),
        tracking_number: Some(TrackingNumber::new(format!(
            "TRK{}",
            now.timestamp_millis()
        ))),
        created_at: now - Duration::days(5),
        updated_at: now - Duration::days(2),
    }
}

/// Three synthesized orders at different lifecycle stages.
pub fn demo_orders(user_id: &UserId) -> Vec<Order> {
    let now = Utc::now();
    let books = catalog();
    let address = demo_address();

    let delivered_lines = order_lines(books.get(0..2).unwrap_or_default(), 1);
    let shipped_lines = order_lines(books.get(2..4).unwrap_or_default(), 2);
    let pending_lines = order_lines(books.get(4..5).unwrap_or_default(), 1);

    vec![
        Order {
            id: OrderId::new("ORD001"),
            user_id: user_id.clone(),
            items: delivered_lines.clone(),
            total_amount: with_tax(lines_subtotal(&delivered_lines)),
            status: OrderStatus::Delivered,
            payment_status: PaymentStatus::Completed,
            shipping_address: address.clone(),
            tracking_number: Some(TrackingNumber::new("TRK123456789")),
            created_at: now - Duration::days(15),
            updated_at: now - Duration::days(10),
        },
        Order {
            id: OrderId::new("ORD002"),
            user_id: user_id.clone(),
            items: shipped_lines.clone(),
            total_amount: with_tax(lines_subtotal(&shipped_lines)),
            status: OrderStatus::Shipped,
            payment_status: PaymentStatus::Completed,
            shipping_address: address.clone(),
            tracking_number: Some(TrackingNumber::new("TRK987654321")),
            created_at: now - Duration::days(5),
            updated_at: now - Duration::days(2),
        },
        Order {
            id: OrderId::new("ORD003"),
            user_id: user_id.clone(),
            items: pending_lines.clone(),
            total_amount: with_tax(lines_subtotal(&pending_lines)),
            status: OrderStatus::Pending,
            payment_status: PaymentStatus::Completed,
            shipping_address: address,
            tracking_number: None,
            created_at: now - Duration::days(1),
            updated_at: now - Duration::days(1),
        },
    ]
}

/// Mint a fixture order id from the current timestamp.
pub fn minted_order_id() -> OrderId {
    OrderId::new(format!("ORD{}", Utc::now().timestamp_millis()))
}

// =============================================================================
// Profile
// =============================================================================

/// The demo user profile. Exactly one address is marked default.
pub fn demo_profile(user_id: &UserId) -> UserProfile {
    UserProfile {
        id: user_id.clone(),
        email: "user@example.com".to_owned(),
        name: "John Doe".to_owned(),
        avatar: None,
        addresses: vec![
            demo_address(),
            Address {
                id: AddressId::new("2"),
                street: "456 Oak Avenue".to_owned(),
                city: "Los Angeles".to_owned(),
                state: "CA".to_owned(),
                postal_code: "90001".to_owned(),
                country: "United States".to_owned(),
                is_default: false,
            },
        ],
        wishlist: vec![BookId::new("1"), BookId::new("2"), BookId::new("3")],
        preferences: UserPreferences {
            favorite_categories: vec![
                "Fiction".to_owned(),
                "Science Fiction".to_owned(),
                "Mystery".to_owned(),
            ],
            notifications: true,
            newsletter: true,
        },
        created_at: Utc::now() - Duration::days(365),
    }
}

/// The guest profile, the neutral fallback when the profile endpoint is down.
pub fn guest_profile(user_id: &UserId) -> UserProfile {
    UserProfile {
        id: user_id.clone(),
        email: "user@example.com".to_owned(),
        name: "Guest User".to_owned(),
        avatar: None,
        addresses: Vec::new(),
        wishlist: Vec::new(),
        preferences: UserPreferences {
            favorite_categories: Vec::new(),
            notifications: true,
            newsletter: true,
        },
        created_at: Utc::now(),
    }
}

// =============================================================================
// Auth
// =============================================================================

/// Synthesize a signed-in session for fixture mode.
pub fn demo_login(email: &str) -> LoginResponse {
    let name = email.split('@').next().unwrap_or("Reader");
    LoginResponse {
        token: "fixture-token".to_owned(),
        name: name.to_owned(),
        email: email.to_owned(),
    }
}
