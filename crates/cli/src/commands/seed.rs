//! Seed the database with cafes from a YAML file.
//!
//! The file is a list of records in the JSON API shape:
//!
//! ```yaml
//! - name: Monmouth Coffee
//!   map_url: https://maps.example/monmouth
//!   img_url: https://img.example/monmouth.jpg
//!   location: Borough
//!   seats: 10-20
//!   has_wifi: false
//!   has_toilet: true
//!   has_sockets: false
//!   can_take_calls: false
//!   coffee_price: "£3.00"
//!   lat: 51.5055
//!   lng: -0.0913
//! ```

use std::path::Path;

use tracing::{info, warn};

use cafe_map_core::{Coordinates, NewCafe};
use cafe_map_web::config::database_url_from_env;
use cafe_map_web::db::{self, CafeRepository};

/// Counts reported after seeding.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct SeedSummary {
    pub inserted: usize,
    pub skipped: usize,
}

/// Parse a YAML list of cafes, rejecting invalid coordinates.
///
/// # Errors
///
/// Returns an error if the YAML is malformed or a record lies off the Earth.
pub fn parse(content: &str) -> Result<Vec<NewCafe>, Box<dyn std::error::Error>> {
    let cafes: Vec<NewCafe> = serde_yaml::from_str(content)?;
    for cafe in &cafes {
        Coordinates::new(cafe.lat, cafe.lon).map_err(|e| format!("{}: {e}", cafe.name))?;
    }
    Ok(cafes)
}

/// Insert every cafe from `path` whose name is not stored yet.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, or a database
/// operation fails.
pub async fn run(path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    if !path.exists() {
        return Err(format!("File not found: {}", path.display()).into());
    }

    info!(path = %path.display(), "Loading cafes from file");
    let content = tokio::fs::read_to_string(path).await?;
    let cafes = parse(&content)?;
    info!(cafes = cafes.len(), "Parsed seed file");

    let pool = db::create_pool(&database_url_from_env()).await?;
    db::migrate(&pool).await?;

    let summary = seed(&CafeRepository::new(&pool), &cafes).await?;

    info!("Seeding complete!");
    info!("  Cafes inserted: {}", summary.inserted);
    info!("  Cafes skipped (already exist): {}", summary.skipped);
    Ok(())
}

async fn seed(
    repo: &CafeRepository<'_>,
    cafes: &[NewCafe],
) -> Result<SeedSummary, db::RepositoryError> {
    let mut summary = SeedSummary::default();
    for cafe in cafes {
        if repo.get_by_name(&cafe.name).await?.is_some() {
            warn!(name = %cafe.name, "Cafe already exists, skipping");
            summary.skipped += 1;
            continue;
        }
        repo.insert(cafe).await?;
        summary.inserted += 1;
    }
    Ok(summary)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const SEED: &str = r#"
- name: Monmouth Coffee
  map_url: https://maps.example/monmouth
  img_url: https://img.example/monmouth.jpg
  location: Borough
  seats: 10-20
  has_wifi: false
  has_toilet: true
  has_sockets: false
  can_take_calls: false
  coffee_price: "£3.00"
  lat: 51.5055
  lng: -0.0913
- name: Prufrock
  map_url: https://maps.example/prufrock
  img_url: https://img.example/prufrock.jpg
  location: Clerkenwell
  seats: 20-30
  has_wifi: true
  has_toilet: true
  has_sockets: true
  can_take_calls: false
  lat: 51.5196
  lng: -0.1095
"#;

    #[test]
    fn test_parse_seed_file() {
        let cafes = parse(SEED).unwrap();
        assert_eq!(cafes.len(), 2);
        assert_eq!(cafes[0].coffee_price.as_deref(), Some("£3.00"));
        assert!(cafes[1].coffee_price.is_none());
        assert!(cafes[1].amenities.has_sockets);
        assert!((cafes[1].lon + 0.1095).abs() < f64::EPSILON);
    }

    #[test]
    fn test_parse_rejects_invalid_coordinates() {
        let content = SEED.replace("lat: 51.5196", "lat: 151.5196");
        let err = parse(&content).unwrap_err();
        assert!(err.to_string().contains("Prufrock"));
    }

    #[tokio::test]
    async fn test_seed_skips_existing_names() {
        let pool = db::create_memory_pool().await.unwrap();
        db::migrate(&pool).await.unwrap();
        let repo = CafeRepository::new(&pool);
        let cafes = parse(SEED).unwrap();

        let first = seed(&repo, &cafes).await.unwrap();
        assert_eq!(
            first,
            SeedSummary {
                inserted: 2,
                skipped: 0
            }
        );

        let second = seed(&repo, &cafes).await.unwrap();
        assert_eq!(
            second,
            SeedSummary {
                inserted: 0,
                skipped: 2
            }
        );
        assert_eq!(repo.count().await.unwrap(), 2);
    }
}
