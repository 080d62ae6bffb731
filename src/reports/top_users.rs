//! Users owning the most environments.

use std::collections::HashMap;

use serde::Serialize;

use crate::{error::ReportError, models::Environment};

use super::UNKNOWN_LABEL;

// ---

pub const TOP_USERS_LIMIT: usize = 15;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserEnvironmentCount {
    // ---
    pub user_id: String,
    pub name: String,
    pub environment_count: u64,
}

/// Rank users by number of environments owned, keeping the first
/// [`TOP_USERS_LIMIT`].
///
/// Ties keep the order in which each user first appears in `environments`,
/// which is the store's stable ordering. User ids missing from `names` are
/// labelled [`UNKNOWN_LABEL`].
pub fn top_users(
    environments: &[Environment],
    names: &HashMap<String, String>,
) -> Result<Vec<UserEnvironmentCount>, ReportError> {
    // ---
    if environments.is_empty() {
        return Err(ReportError::not_found("no environment data"));
    }

    // (user_id, count) in order of first appearance
    let mut order: Vec<(&str, u64)> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();
    for env in environments {
        match index.get(env.user_id.as_str()) {
            Some(&i) => order[i].1 += 1,
            None => {
                index.insert(env.user_id.as_str(), order.len());
                order.push((env.user_id.as_str(), 1));
            }
        }
    }

    // sort_by is stable
    order.sort_by(|a, b| b.1.cmp(&a.1));

    Ok(order
        .into_iter()
        .take(TOP_USERS_LIMIT)
        .map(|(user_id, environment_count)| UserEnvironmentCount {
            user_id: user_id.to_string(),
            name: names
                .get(user_id)
                .cloned()
                .unwrap_or_else(|| UNKNOWN_LABEL.to_string()),
            environment_count,
        })
        .collect())
}
