use worklens_core::{ListParams, ListResult, ServiceError, new_id, now_rfc3339};

use crate::model::Company;
use super::ReviewService;

pub struct CreateCompanyInput {
    pub name: String,
    pub name_ja: Option<String>,
    pub name_zh: Option<String>,
    /// Derived from the name when absent.
    pub slug: Option<String>,
    pub industry: Option<String>,
    pub location: Option<String>,
    pub description: Option<String>,
}

impl ReviewService {
    pub fn create_company(&self, input: CreateCompanyInput) -> Result<Company, ServiceError> {
        let name = input.name.trim().to_string();
        if name.is_empty() {
            return Err(ServiceError::Validation("company name is empty".into()));
        }
        let slug = match input.slug {
            Some(s) => s,
            None => slugify(&name),
        };
        if slug.is_empty() {
            return Err(ServiceError::Validation(format!(
                "cannot derive a slug from '{}'",
                name
            )));
        }

        let now = now_rfc3339();
        let company = Company {
            id: new_id(),
            name,
            name_ja: input.name_ja.filter(|s| !s.is_empty()),
            name_zh: input.name_zh.filter(|s| !s.is_empty()),
            slug,
            industry: input.industry.filter(|s| !s.is_empty()),
            location: input.location.filter(|s| !s.is_empty()),
            description: input.description.filter(|s| !s.is_empty()),
            review_count: 0,
            avg_rating: 0.0,
            create_at: Some(now.clone()),
            update_at: Some(now),
        };
        self.store.insert_company(&company)?;
        Ok(company)
    }

    pub fn get_company(&self, id: &str) -> Result<Company, ServiceError> {
        self.store.get_company(id)
    }

    pub fn get_company_by_slug(&self, slug: &str) -> Result<Company, ServiceError> {
        self.store.get_company_by_slug(slug)
    }

    pub fn list_companies(
        &self,
        params: &ListParams,
        industry: Option<&str>,
    ) -> Result<ListResult<Company>, ServiceError> {
        let (items, total) = self.store.list_companies(
            industry,
            params.sort.as_deref(),
            params.effective_limit(),
            params.offset(),
        )?;
        Ok(ListResult::new(items, total, params))
    }
}

/// Lowercase ASCII slug: alphanumerics kept, runs of anything else
/// collapse to a single hyphen.
fn slugify(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut pending_hyphen = false;
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_hyphen && !out.is_empty() {
                out.push('-');
            }
            pending_hyphen = false;
            out.push(c.to_ascii_lowercase());
        } else {
            pending_hyphen = true;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::Store;

    fn service() -> ReviewService {
        ReviewService::new(Store::open_in_memory().unwrap())
    }

    fn input(name: &str) -> CreateCompanyInput {
        CreateCompanyInput {
            name: name.into(),
            name_ja: None,
            name_zh: None,
            slug: None,
            industry: Some("tech".into()),
            location: None,
            description: None,
        }
    }

    #[test]
    fn slug_derived_from_name() {
        let svc = service();
        let c = svc.create_company(input("Acme Robotics, Inc.")).unwrap();
        assert_eq!(c.slug, "acme-robotics-inc");
        assert_eq!(svc.get_company_by_slug("acme-robotics-inc").unwrap().id, c.id);
    }

    #[test]
    fn empty_name_rejected() {
        let svc = service();
        assert!(matches!(
            svc.create_company(input("   ")),
            Err(ServiceError::Validation(_))
        ));
    }

    #[test]
    fn listing_paginates() {
        let svc = service();
        for i in 0..25 {
            svc.create_company(input(&format!("Company {:02}", i))).unwrap();
        }
        let params = ListParams { limit: 10, page: 3, sort: None };
        let r = svc.list_companies(&params, None).unwrap();
        assert_eq!(r.total, 25);
        assert_eq!(r.pages, 3);
        assert_eq!(r.items.len(), 5);
    }

    #[test]
    fn slugify_cases() {
        assert_eq!(slugify("Acme Robotics"), "acme-robotics");
        assert_eq!(slugify("  A  B  "), "a-b");
        assert_eq!(slugify("株式会社"), "");
    }
}
