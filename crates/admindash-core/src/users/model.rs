use serde::{Deserialize, Serialize};

/// A user as returned by the demo listing API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListedUser {
    pub id: u64,
    pub name: String,
    pub username: String,
    pub email: String,
    pub address: Address,
    pub phone: String,
    pub website: String,
    pub company: Company,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Address {
    pub street: String,
    pub suite: String,
    pub city: String,
    pub zipcode: String,
    pub geo: Geo,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Geo {
    pub lat: String,
    pub lng: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Company {
    pub name: String,
    #[serde(rename = "catchPhrase")]
    pub catch_phrase: String,
    pub bs: String,
}

impl ListedUser {
    pub fn city(&self) -> &str {
        &self.address.city
    }

    pub fn company_name(&self) -> &str {
        &self.company.name
    }

    /// Case-insensitive match against name, email or username
    pub fn matches_search(&self, term: &str) -> bool {
        if term.is_empty() {
            return true;
        }
        let term = term.to_lowercase();
        [&self.name, &self.email, &self.username]
            .iter()
            .any(|field| field.to_lowercase().contains(&term))
    }
}

/// Active listing filters. Empty strings mean "no filter".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserFilters {
    pub search: String,
    pub city: String,
    pub company: String,
}

impl UserFilters {
    pub fn is_active(&self) -> bool {
        !self.search.is_empty() || !self.city.is_empty() || !self.company.is_empty()
    }

    pub fn matches(&self, user: &ListedUser) -> bool {
        user.matches_search(&self.search)
            && (self.city.is_empty() || user.city() == self.city)
            && (self.company.is_empty() || user.company_name() == self.company)
    }
}

#[cfg(test)]
pub(crate) fn sample_user(id: u64, name: &str, city: &str, company: &str) -> ListedUser {
    let username = name.split_whitespace().next().unwrap_or(name).to_string();
    ListedUser {
        id,
        name: name.to_string(),
        email: format!("{}@example.org", username.to_lowercase()),
        username,
        address: Address {
            street: "Kulas Light".to_string(),
            suite: "Apt. 556".to_string(),
            city: city.to_string(),
            zipcode: "92998-3874".to_string(),
            geo: Geo {
                lat: "-37.3159".to_string(),
                lng: "81.1496".to_string(),
            },
        },
        phone: "1-770-736-8031".to_string(),
        website: "example.org".to_string(),
        company: Company {
            name: company.to_string(),
            catch_phrase: "Multi-layered client-server neural-net".to_string(),
            bs: "harness real-time e-markets".to_string(),
        },
    }
}
