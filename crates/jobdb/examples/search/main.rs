//! Example demonstrating filtered search fragments.
//!
//! Run with:
//!   cargo run --example search -p jobdb
//!
//! Shows how the same declared filter sequence renders different SQL
//! depending on which raw inputs are present, and how bad numeric input
//! is rejected instead of being silently dropped.

use jobdb::{DbResult, SearchQb};
use rust_decimal::Decimal;

const BASE: &str = "SELECT id, title, salary, equity, company_handle FROM jobs";

fn render(title: Option<&str>, min_salary: Option<&str>, has_equity: Option<&str>) -> DbResult<()> {
    let built = SearchQb::new(BASE)
        .at_least::<i64>("minSalary", "salary", min_salary)
        .flag("hasEquity", "equity > ?", has_equity, Decimal::ZERO)
        .contains("title", "title", title)
        .order_by("title")
        .build();

    println!("title={title:?} minSalary={min_salary:?} hasEquity={has_equity:?}");
    match built {
        Ok(frag) => println!("  -> {} [{} params]\n", frag.sql, frag.params.len()),
        Err(err) => println!("  -> rejected: {err}\n"),
    }
    Ok(())
}

fn main() -> DbResult<()> {
    // No filters: the base statement passes through untouched.
    render(None, None, None)?;

    // All filters: predicates in declaration order, numbered densely.
    render(Some("gineer"), Some("10"), Some("true"))?;

    // A subset: skipped filters leave no gap in the numbering.
    render(Some("dev"), None, Some("true"))?;

    // The flag only arms on the exact literal "true".
    render(None, Some("90000"), Some("false"))?;

    // Unparseable numeric input fails the build.
    render(None, Some("lots"), None)?;

    Ok(())
}
