//! # Contact Query Engine
//!
//! Builds the filter for contact search as an explicit predicate tree and
//! runs it against a [`ContactStore`]. The owner clause is mandatory: a
//! [`ContactQuery`] can only be produced by [`ContactSearch`], whose
//! constructor takes the owner, so an unscoped query cannot reach the store.
//!
//! The same predicate is evaluated in memory ([`Predicate::matches`]) and
//! rendered to parameterised SQL ([`Predicate::to_sql`]).

use crate::database::models::Contact;
use crate::database::store::{ContactStore, StoreError};
use crate::services::pagination::PageRequest;

/// Searchable contact columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactField {
    FirstName,
    LastName,
    Email,
    Phone,
}

impl ContactField {
    /// Column name in the `contacts` table.
    pub fn column(self) -> &'static str {
        match self {
            Self::FirstName => "first_name",
            Self::LastName => "last_name",
            Self::Email => "email",
            Self::Phone => "phone",
        }
    }

    fn value(self, contact: &Contact) -> Option<&str> {
        match self {
            Self::FirstName => Some(contact.first_name.as_str()),
            Self::LastName => contact.last_name.as_deref(),
            Self::Email => contact.email.as_deref(),
            Self::Phone => contact.phone.as_deref(),
        }
    }
}

/// Composable filter expression over contacts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    /// Contact belongs to the given username.
    OwnerIs(String),
    /// Case-insensitive substring match. A missing (null) field never matches.
    Contains { field: ContactField, needle: String },
    /// All children hold. Empty conjunction is true.
    And(Vec<Predicate>),
    /// At least one child holds. Empty disjunction is false.
    Or(Vec<Predicate>),
}

impl Predicate {
    pub fn contains(field: ContactField, needle: impl Into<String>) -> Self {
        Self::Contains { field, needle: needle.into() }
    }

    /// Evaluate the predicate against a single contact.
    pub fn matches(&self, contact: &Contact) -> bool {
        match self {
            Self::OwnerIs(owner) => contact.owner == *owner,
            Self::Contains { field, needle } => field
                .value(contact)
                .map(|value| value.to_lowercase().contains(&needle.to_lowercase()))
                .unwrap_or(false),
            Self::And(children) => children.iter().all(|p| p.matches(contact)),
            Self::Or(children) => children.iter().any(|p| p.matches(contact)),
        }
    }

    /// Render a SQL boolean expression. Values are pushed onto `params` and
    /// referenced positionally (`$1`, `$2`, ...), continuing from whatever
    /// `params` already holds.
    pub fn to_sql(&self, params: &mut Vec<String>) -> String {
        match self {
            Self::OwnerIs(owner) => {
                params.push(owner.clone());
                format!("username = ${}", params.len())
            }
            Self::Contains { field, needle } => {
                params.push(format!("%{}%", escape_like(needle)));
                format!("{} ILIKE ${} ESCAPE '\\'", field.column(), params.len())
            }
            Self::And(children) => join_sql(children, " AND ", "TRUE", params),
            Self::Or(children) => join_sql(children, " OR ", "FALSE", params),
        }
    }
}

fn join_sql(children: &[Predicate], separator: &str, empty: &str, params: &mut Vec<String>) -> String {
    if children.is_empty() {
        return empty.to_string();
    }
    let parts: Vec<String> = children.iter().map(|child| child.to_sql(params)).collect();
    format!("({})", parts.join(separator))
}

/// Escape LIKE wildcards so user input is always matched literally.
fn escape_like(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for ch in input.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

/// Search parameters scoped to one owner.
#[derive(Debug, Clone)]
pub struct ContactSearch {
    owner: String,
    name: Option<String>,
    email: Option<String>,
    phone: Option<String>,
}

impl ContactSearch {
    pub fn new(owner: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: None,
            email: None,
            phone: None,
        }
    }

    /// Matches first name or last name.
    pub fn name(mut self, name: Option<String>) -> Self {
        self.name = non_blank(name);
        self
    }

    pub fn email(mut self, email: Option<String>) -> Self {
        self.email = non_blank(email);
        self
    }

    pub fn phone(mut self, phone: Option<String>) -> Self {
        self.phone = non_blank(phone);
        self
    }

    /// `owner AND (first_name OR last_name)? AND email? AND phone?`
    pub fn predicate(&self) -> Predicate {
        let mut clauses = vec![Predicate::OwnerIs(self.owner.clone())];

        if let Some(name) = &self.name {
            clauses.push(Predicate::Or(vec![
                Predicate::contains(ContactField::FirstName, name.clone()),
                Predicate::contains(ContactField::LastName, name.clone()),
            ]));
        }
        if let Some(email) = &self.email {
            clauses.push(Predicate::contains(ContactField::Email, email.clone()));
        }
        if let Some(phone) = &self.phone {
            clauses.push(Predicate::contains(ContactField::Phone, phone.clone()));
        }

        Predicate::And(clauses)
    }

    /// Freeze the search into a store query for one page.
    pub fn into_query(self, page: PageRequest) -> ContactQuery {
        ContactQuery {
            predicate: self.predicate(),
            page,
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Owner-scoped predicate plus the page window, as handed to the store.
#[derive(Debug, Clone)]
pub struct ContactQuery {
    predicate: Predicate,
    page: PageRequest,
}

impl ContactQuery {
    pub fn predicate(&self) -> &Predicate {
        &self.predicate
    }

    pub fn page(&self) -> PageRequest {
        self.page
    }
}

/// One page of matches plus the size of the whole matching set.
#[derive(Debug, Clone)]
pub struct SearchResult {
    pub contacts: Vec<Contact>,
    pub total: u64,
}

/// Run an owner-scoped search for one page, ordered by contact id.
pub async fn search<S>(
    store: &S,
    search: ContactSearch,
    page: PageRequest,
) -> Result<SearchResult, StoreError>
where
    S: ContactStore + ?Sized,
{
    let query = search.into_query(page);
    let (contacts, total) = store.search_contacts(&query).await?;
    tracing::debug!(
        page = page.page,
        size = page.size,
        returned = contacts.len(),
        total,
        "contact search executed"
    );
    Ok(SearchResult { contacts, total })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contact(owner: &str, first: &str, last: Option<&str>, email: Option<&str>, phone: Option<&str>) -> Contact {
        Contact {
            id: uuid::Uuid::new_v4().to_string(),
            owner: owner.to_string(),
            first_name: first.to_string(),
            last_name: last.map(str::to_string),
            email: email.map(str::to_string),
            phone: phone.map(str::to_string),
        }
    }

    #[test]
    fn test_owner_clause_always_present() {
        let predicate = ContactSearch::new("alice").predicate();
        assert_eq!(predicate, Predicate::And(vec![Predicate::OwnerIs("alice".into())]));

        let other = contact("bob", "dada", None, None, None);
        assert!(!predicate.matches(&other));
    }

    #[test]
    fn test_name_matches_first_or_last_name() {
        let predicate = ContactSearch::new("alice").name(Some("sal".into())).predicate();

        assert!(predicate.matches(&contact("alice", "Salim", None, None, None)));
        assert!(predicate.matches(&contact("alice", "dada", Some("SALAH"), None, None)));
        assert!(!predicate.matches(&contact("alice", "dada", None, None, None)));
    }

    #[test]
    fn test_filters_are_conjunctive_and_case_insensitive() {
        let predicate = ContactSearch::new("alice")
            .email(Some("example.com".into()))
            .phone(Some("18382".into()))
            .predicate();

        assert!(predicate.matches(&contact("alice", "x", None, Some("Salah@Example.com"), Some("921838219"))));
        assert!(!predicate.matches(&contact("alice", "x", None, Some("Salah@Example.com"), Some("000"))));
        assert!(!predicate.matches(&contact("alice", "x", None, None, Some("921838219"))));
    }

    #[test]
    fn test_blank_filters_are_ignored() {
        let predicate = ContactSearch::new("alice")
            .name(Some("   ".into()))
            .email(Some(String::new()))
            .predicate();
        assert_eq!(predicate, ContactSearch::new("alice").predicate());
    }

    #[test]
    fn test_sql_rendering_binds_values_and_escapes_wildcards() {
        let predicate = ContactSearch::new("alice").name(Some("50%_off".into())).predicate();
        let mut params = Vec::new();
        let sql = predicate.to_sql(&mut params);

        assert_eq!(
            sql,
            "(username = $1 AND (first_name ILIKE $2 ESCAPE '\\' OR last_name ILIKE $3 ESCAPE '\\'))"
        );
        assert_eq!(params, vec!["alice", "%50\\%\\_off%", "%50\\%\\_off%"]);
    }

    #[test]
    fn test_empty_compositions() {
        let c = contact("alice", "x", None, None, None);
        assert!(Predicate::And(vec![]).matches(&c));
        assert!(!Predicate::Or(vec![]).matches(&c));

        let mut params = Vec::new();
        assert_eq!(Predicate::Or(vec![]).to_sql(&mut params), "FALSE");
        assert!(params.is_empty());
    }
}
