use serde::{Deserialize, Serialize};

/// Outcome of a catalog reset.
#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct SeedResponse {
    /// Products removed before seeding.
    #[schema(example = 12)]
    pub removed: u64,
    /// Products inserted by the seed.
    #[schema(example = 4)]
    pub inserted: u64,
}
