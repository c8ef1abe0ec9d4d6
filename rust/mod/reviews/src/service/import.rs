use std::path::Path;

use serde::Deserialize;
use tracing::{info, warn};

use worklens_core::ServiceError;

use crate::model::{ReviewCategory, ReviewStatus};
use super::{CreateCompanyInput, CreateReviewInput, ReviewService};

/// Outcome of a CSV import run. One bad row never aborts the import;
/// it lands in `skipped` with a reason instead.
#[derive(Debug, Default)]
pub struct ImportReport {
    pub companies: usize,
    pub reviews: usize,
    pub skipped: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct CompanyRow {
    name: String,
    #[serde(default)]
    name_ja: Option<String>,
    #[serde(default)]
    name_zh: Option<String>,
    #[serde(default)]
    slug: Option<String>,
    #[serde(default)]
    industry: Option<String>,
    #[serde(default)]
    location: Option<String>,
    #[serde(default)]
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ReviewRow {
    company_slug: String,
    category: String,
    rating: u8,
    title: String,
    comment: String,
    #[serde(default)]
    employment_status: Option<String>,
    #[serde(default)]
    submitted_at: Option<String>,
}

impl ReviewService {
    /// Bulk-load companies (and optionally reviews) from CSV files.
    ///
    /// Reviews reference companies by slug and are imported as
    /// Published, so aggregates update as rows land.
    pub fn import_csv(
        &self,
        companies_path: &Path,
        reviews_path: Option<&Path>,
    ) -> Result<ImportReport, ServiceError> {
        let mut report = ImportReport::default();
        self.import_companies(companies_path, &mut report)?;
        if let Some(path) = reviews_path {
            self.import_reviews(path, &mut report)?;
        }
        info!(
            "import finished: {} companies, {} reviews, {} skipped",
            report.companies,
            report.reviews,
            report.skipped.len()
        );
        Ok(report)
    }

    fn import_companies(
        &self,
        path: &Path,
        report: &mut ImportReport,
    ) -> Result<(), ServiceError> {
        let mut reader = csv::Reader::from_path(path)
            .map_err(|e| ServiceError::Validation(format!("cannot read {:?}: {}", path, e)))?;

        for (idx, row) in reader.deserialize::<CompanyRow>().enumerate() {
            let line = idx + 2; // header is line 1
            let row = match row {
                Ok(r) => r,
                Err(e) => {
                    skip(report, format!("companies line {}: {}", line, e));
                    continue;
                }
            };
            let result = self.create_company(CreateCompanyInput {
                name: row.name,
                name_ja: row.name_ja,
                name_zh: row.name_zh,
                slug: row.slug.filter(|s| !s.is_empty()),
                industry: row.industry,
                location: row.location,
                description: row.description,
            });
            match result {
                Ok(_) => report.companies += 1,
                Err(e) => skip(report, format!("companies line {}: {}", line, e)),
            }
        }
        Ok(())
    }

    fn import_reviews(&self, path: &Path, report: &mut ImportReport) -> Result<(), ServiceError> {
        let mut reader = csv::Reader::from_path(path)
            .map_err(|e| ServiceError::Validation(format!("cannot read {:?}: {}", path, e)))?;

        for (idx, row) in reader.deserialize::<ReviewRow>().enumerate() {
            let line = idx + 2;
            let row = match row {
                Ok(r) => r,
                Err(e) => {
                    skip(report, format!("reviews line {}: {}", line, e));
                    continue;
                }
            };
            let Some(category) = ReviewCategory::parse(&row.category) else {
                skip(
                    report,
                    format!("reviews line {}: unknown category '{}'", line, row.category),
                );
                continue;
            };
            let company = match self.get_company_by_slug(&row.company_slug) {
                Ok(c) => c,
                Err(e) => {
                    skip(report, format!("reviews line {}: {}", line, e));
                    continue;
                }
            };
            let result = self.create_review(
                CreateReviewInput {
                    company_id: company.id,
                    category,
                    rating: row.rating,
                    title: row.title,
                    comment: row.comment,
                    employment_status: row.employment_status,
                    submitted_at: row.submitted_at.filter(|s| !s.is_empty()),
                },
                ReviewStatus::Published,
            );
            match result {
                Ok(_) => report.reviews += 1,
                Err(e) => skip(report, format!("reviews line {}: {}", line, e)),
            }
        }
        Ok(())
    }
}

fn skip(report: &mut ImportReport, reason: String) {
    warn!("import: {}", reason);
    report.skipped.push(reason);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::AccessLevel;
    use crate::store::Store;
    use std::fs;
    use worklens_core::ListParams;

    const COMPANIES_CSV: &str = "\
name,name_ja,name_zh,slug,industry,location,description
Acme Robotics,アクメ,,acme,manufacturing,Tokyo,Robots
Globex,,,globex,tech,Osaka,
,,,broken-no-name,tech,,
";

    const REVIEWS_CSV: &str = "\
company_slug,category,rating,title,comment,employment_status,submitted_at
acme,salary,4,Good pay,Long comment here,current,2024-01-10T00:00:00Z
acme,nonsense,3,Bad category,x,,
globex,culture,9,Out of range,x,,
missing,culture,3,No company,x,,
globex,culture,5,Great team,Friendly people,former,
";

    #[test]
    fn import_skips_bad_rows_and_keeps_good_ones() {
        let dir = tempfile::tempdir().unwrap();
        let companies = dir.path().join("companies.csv");
        let reviews = dir.path().join("reviews.csv");
        fs::write(&companies, COMPANIES_CSV).unwrap();
        fs::write(&reviews, REVIEWS_CSV).unwrap();

        let svc = ReviewService::new(Store::open_in_memory().unwrap());
        let report = svc.import_csv(&companies, Some(&reviews)).unwrap();

        assert_eq!(report.companies, 2);
        assert_eq!(report.reviews, 2);
        // 1 nameless company + bad category + bad rating + missing company.
        assert_eq!(report.skipped.len(), 4);

        let acme = svc.get_company_by_slug("acme").unwrap();
        assert_eq!(acme.review_count, 1);
        assert_eq!(acme.name_ja.as_deref(), Some("アクメ"));

        let globex = svc.get_company_by_slug("globex").unwrap();
        let params = ListParams::default();
        let listed = svc
            .list_reviews(&globex.id, None, &params, AccessLevel::Full)
            .unwrap();
        assert_eq!(listed.total, 1);
        assert_eq!(listed.items[0].title, "Great team");
    }

    #[test]
    fn missing_file_is_a_validation_error() {
        let svc = ReviewService::new(Store::open_in_memory().unwrap());
        let err = svc.import_csv(Path::new("/nonexistent.csv"), None);
        assert!(matches!(err, Err(ServiceError::Validation(_))));
    }
}
