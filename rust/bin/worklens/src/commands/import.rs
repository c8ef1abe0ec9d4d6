//! `worklens import` — offline CSV import into the review database.

use std::path::Path;

use worklens_reviews::service::ReviewService;
use worklens_reviews::store::Store;

pub fn run(db: &Path, companies: &Path, reviews: Option<&Path>) -> anyhow::Result<()> {
    let store = Store::open(db).map_err(|e| anyhow::anyhow!("cannot open {:?}: {}", db, e))?;
    let service = ReviewService::new(store);

    let report = service
        .import_csv(companies, reviews)
        .map_err(|e| anyhow::anyhow!("import failed: {}", e))?;

    println!(
        "Imported {} companies, {} reviews.",
        report.companies, report.reviews
    );
    if !report.skipped.is_empty() {
        println!("Skipped {} rows:", report.skipped.len());
        for reason in &report.skipped {
            println!("  - {}", reason);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn import_into_fresh_database() {
        let dir = tempfile::tempdir().unwrap();
        let db = dir.path().join("reviews.sqlite");
        let companies = dir.path().join("companies.csv");
        fs::write(
            &companies,
            "name,name_ja,name_zh,slug,industry,location,description\n\
             Acme,,,acme,tech,,\n",
        )
        .unwrap();

        run(&db, &companies, None).unwrap();

        let store = Store::open(&db).unwrap();
        let service = ReviewService::new(store);
        assert!(service.get_company_by_slug("acme").is_ok());
    }
}
