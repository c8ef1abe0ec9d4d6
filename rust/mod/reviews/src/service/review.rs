use serde::Serialize;

use worklens_core::{ListParams, ListResult, ServiceError, new_id, now_rfc3339};

use crate::model::{AccessLevel, Review, ReviewCategory, ReviewStatus, ReviewView};
use super::ReviewService;

pub struct CreateReviewInput {
    pub company_id: String,
    pub category: ReviewCategory,
    pub rating: u8,
    pub title: String,
    pub comment: String,
    pub employment_status: Option<String>,
    pub submitted_at: Option<String>,
}

/// Published review count for one category of a company.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CategoryCount {
    pub category: ReviewCategory,
    pub count: usize,
}

impl ReviewService {
    /// Create a review with the given lifecycle status. Published
    /// reviews immediately update the company's aggregates.
    pub fn create_review(
        &self,
        input: CreateReviewInput,
        status: ReviewStatus,
    ) -> Result<Review, ServiceError> {
        if !(1..=5).contains(&input.rating) {
            return Err(ServiceError::Validation(format!(
                "rating {} out of range (1..=5)",
                input.rating
            )));
        }
        if input.title.trim().is_empty() {
            return Err(ServiceError::Validation("review title is empty".into()));
        }
        // Company must exist before we accept the review.
        let company = self.store.get_company(&input.company_id)?;

        let review = Review {
            id: new_id(),
            company_id: input.company_id,
            category: input.category,
            rating: input.rating,
            title: input.title,
            comment: input.comment,
            employment_status: input.employment_status,
            status,
            submitted_at: Some(input.submitted_at.unwrap_or_else(now_rfc3339)),
        };
        self.store.insert_review(&review)?;

        if status == ReviewStatus::Published {
            self.bump_aggregates(company, review.rating)?;
        }
        Ok(review)
    }

    /// List published reviews with access-level masking applied.
    pub fn list_reviews(
        &self,
        company_id: &str,
        category: Option<ReviewCategory>,
        params: &ListParams,
        access: AccessLevel,
    ) -> Result<ListResult<ReviewView>, ServiceError> {
        // 404 for unknown companies rather than an empty list.
        self.store.get_company(company_id)?;
        let (reviews, total) = self.store.list_published_reviews(
            company_id,
            category,
            params.effective_limit(),
            params.offset(),
        )?;
        let items = reviews.iter().map(|r| r.visible_as(access)).collect();
        Ok(ListResult::new(items, total, params))
    }

    /// Per-category published review counts, in display order.
    pub fn company_categories(&self, company_id: &str) -> Result<Vec<CategoryCount>, ServiceError> {
        self.store.get_company(company_id)?;
        let counts = self.store.category_counts(company_id)?;
        Ok(ReviewCategory::ALL
            .iter()
            .map(|cat| CategoryCount {
                category: *cat,
                count: counts
                    .iter()
                    .find(|(c, _)| c == cat)
                    .map(|(_, n)| *n)
                    .unwrap_or(0),
            })
            .collect())
    }

    /// Incrementally fold one new rating into the company row.
    pub(crate) fn bump_aggregates(
        &self,
        mut company: crate::model::Company,
        rating: u8,
    ) -> Result<(), ServiceError> {
        let old_count = company.review_count as f64;
        company.avg_rating =
            (company.avg_rating * old_count + rating as f64) / (old_count + 1.0);
        company.review_count += 1;
        company.update_at = Some(now_rfc3339());
        self.store.update_company(&company)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::CreateCompanyInput;
    use crate::store::Store;

    fn service_with_company() -> (ReviewService, String) {
        let svc = ReviewService::new(Store::open_in_memory().unwrap());
        let c = svc
            .create_company(CreateCompanyInput {
                name: "Acme".into(),
                name_ja: None,
                name_zh: None,
                slug: None,
                industry: None,
                location: None,
                description: None,
            })
            .unwrap();
        (svc, c.id)
    }

    fn review_input(company_id: &str, rating: u8) -> CreateReviewInput {
        CreateReviewInput {
            company_id: company_id.into(),
            category: ReviewCategory::Culture,
            rating,
            title: "title".into(),
            comment: "c".repeat(100),
            employment_status: None,
            submitted_at: None,
        }
    }

    #[test]
    fn rating_range_enforced() {
        let (svc, id) = service_with_company();
        for bad in [0u8, 6, 255] {
            assert!(matches!(
                svc.create_review(review_input(&id, bad), ReviewStatus::Published),
                Err(ServiceError::Validation(_))
            ));
        }
    }

    #[test]
    fn unknown_company_rejected() {
        let (svc, _) = service_with_company();
        assert!(matches!(
            svc.create_review(review_input("ghost", 3), ReviewStatus::Published),
            Err(ServiceError::NotFound(_))
        ));
    }

    #[test]
    fn published_reviews_update_aggregates() {
        let (svc, id) = service_with_company();
        svc.create_review(review_input(&id, 5), ReviewStatus::Published).unwrap();
        svc.create_review(review_input(&id, 3), ReviewStatus::Published).unwrap();
        svc.create_review(review_input(&id, 1), ReviewStatus::Pending).unwrap();

        let c = svc.get_company(&id).unwrap();
        assert_eq!(c.review_count, 2);
        assert!((c.avg_rating - 4.0).abs() < 1e-9);
    }

    #[test]
    fn masking_follows_access_level() {
        let (svc, id) = service_with_company();
        svc.create_review(review_input(&id, 4), ReviewStatus::Published).unwrap();

        let params = ListParams::default();
        let preview = svc
            .list_reviews(&id, None, &params, AccessLevel::Preview)
            .unwrap();
        assert!(preview.items[0].masked);
        assert!(preview.items[0].comment.ends_with('…'));

        let full = svc
            .list_reviews(&id, None, &params, AccessLevel::Full)
            .unwrap();
        assert!(!full.items[0].masked);
        assert_eq!(full.items[0].comment.chars().count(), 100);
    }

    #[test]
    fn category_filter_and_counts() {
        let (svc, id) = service_with_company();
        svc.create_review(review_input(&id, 4), ReviewStatus::Published).unwrap();
        let mut salary = review_input(&id, 2);
        salary.category = ReviewCategory::Salary;
        svc.create_review(salary, ReviewStatus::Published).unwrap();

        let params = ListParams::default();
        let culture = svc
            .list_reviews(&id, Some(ReviewCategory::Culture), &params, AccessLevel::Full)
            .unwrap();
        assert_eq!(culture.total, 1);

        let counts = svc.company_categories(&id).unwrap();
        assert_eq!(counts.len(), ReviewCategory::ALL.len());
        let salary_count = counts
            .iter()
            .find(|c| c.category == ReviewCategory::Salary)
            .unwrap();
        assert_eq!(salary_count.count, 1);
        let career_count = counts
            .iter()
            .find(|c| c.category == ReviewCategory::Career)
            .unwrap();
        assert_eq!(career_count.count, 0);
    }

    #[test]
    fn listing_unknown_company_is_not_found() {
        let (svc, _) = service_with_company();
        let params = ListParams::default();
        assert!(matches!(
            svc.list_reviews("ghost", None, &params, AccessLevel::Full),
            Err(ServiceError::NotFound(_))
        ));
    }
}
