//! Catalog commands: browse, show, search.

use paperback_core::{BookId, Price};
use paperback_storefront::api::{Book, SearchFilters, SortKey, Storefront};
use rust_decimal::Decimal;

use super::note_degradation;

type CommandResult = Result<(), Box<dyn std::error::Error>>;

/// Search flags collected from the command line.
pub struct SearchOptions {
    pub category: Option<String>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    pub rating: Option<f32>,
    pub in_stock: bool,
    pub sort: String,
}

/// List one page of the catalog.
pub async fn browse(shop: &Storefront, page: u32, limit: u32) -> CommandResult {
    let result = shop.catalog.list_books(page, limit).await;
    note_degradation(&result);

    let listing = result.data();
    for book in &listing.data {
        print_line(book);
    }
    println!(
        "page {}/{} ({} books total)",
        listing.page,
        listing.total.div_ceil(listing.limit.max(1) as usize),
        listing.total
    );
    Ok(())
}

/// Show one book in detail.
pub async fn show(shop: &Storefront, id: &str) -> CommandResult {
    let id = BookId::new(id);
    let result = shop.catalog.get_book(&id).await;
    note_degradation(&result);

    let Some(book) = result.data() else {
        return Err(format!("no book with id {id}").into());
    };

    println!("{} - {}", book.title, book.author);
    println!("  {}", book.description);
    println!(
        "  {} | {} | rating {:.1} ({} reviews)",
        book.price.display(),
        book.category,
        book.rating,
        book.review_count
    );
    if let Some(publisher) = &book.publisher {
        println!("  published by {publisher}");
    }
    println!(
        "  {}",
        if book.in_stock {
            format!("{} in stock", book.stock_count)
        } else {
            "out of stock".to_owned()
        }
    );

    let rating = shop.reviews.rating_for(&id).await;
    note_degradation(&rating);
    println!(
        "  community: {:.1} stars over {} ratings",
        rating.data().average_rating,
        rating.data().total_ratings
    );
    Ok(())
}

/// Search the catalog with filters and a sort order.
pub async fn search(shop: &Storefront, query: &str, options: SearchOptions) -> CommandResult {
    let filters = SearchFilters {
        category: options.category,
        min_price: options.min_price.map(Price::new),
        max_price: options.max_price.map(Price::new),
        rating: options.rating,
        in_stock_only: options.in_stock.then_some(true),
        sort_by: Some(parse_sort(&options.sort)?),
    };

    let result = shop.search.search(query, &filters).await;
    note_degradation(&result);

    let matches = result.data();
    if matches.data.is_empty() {
        println!("no matches for {query:?}");
        return Ok(());
    }
    for book in &matches.data {
        print_line(book);
    }
    println!("{} match(es)", matches.total);
    Ok(())
}

fn parse_sort(label: &str) -> Result<SortKey, String> {
    match label {
        "relevance" => Ok(SortKey::Relevance),
        "price" => Ok(SortKey::Price),
        "rating" => Ok(SortKey::Rating),
        "newest" => Ok(SortKey::Newest),
        other => Err(format!(
            "unknown sort {other:?}; expected relevance, price, rating, or newest"
        )),
    }
}

fn print_line(book: &Book) {
    println!(
        "{:>4}  {:<40} {:<20} {:>8}  {}",
        book.id.as_str(),
        book.title,
        book.author,
        book.price.display(),
        if book.in_stock { "" } else { "(out of stock)" }
    );
}
