//! Demo catalog: three public images with their labels and discussion.

use aws_sdk_dynamodb::Client as DynamoClient;
use cosmoscope_atoms::assets::service::put_asset;
use cosmoscope_atoms::assets::{Asset, CaptureInfo};
use cosmoscope_atoms::categories::service::upsert_category;
use cosmoscope_atoms::categories::{CreateCategoryPayload, SpaceCategory};
use cosmoscope_atoms::comments::service::put_comment_at;
use cosmoscope_atoms::comments::{Comment, CommentScope, NewComment};
use cosmoscope_atoms::labels::service::put_label;
use cosmoscope_atoms::labels::{Label, NormRect};
use cosmoscope_atoms::{AtomError, AtomResult};
use serde_json::json;

pub const ANDROMEDA: &str = "DEMO_ANDROMEDA";
pub const CASSINI_RINGS: &str = "DEMO_CASSINI_RINGS";
pub const MESSIER_51: &str = "MESSIER_51";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub created: usize,
    pub skipped: usize,
}

impl SeedReport {
    fn record(&mut self, outcome: AtomResult<()>) -> AtomResult<()> {
        match outcome {
            Ok(()) => self.created += 1,
            Err(e) if e.is_conflict() => self.skipped += 1,
            Err(e) => return Err(e),
        }
        Ok(())
    }
}

pub fn demo_categories() -> Vec<CreateCategoryPayload> {
    [
        (SpaceCategory::Star, "Individual stars and stellar objects"),
        (SpaceCategory::Galaxy, "Galaxies and galactic structures"),
        (SpaceCategory::Nebula, "Gas clouds and stellar nurseries"),
        (SpaceCategory::Planet, "Planetary objects and moons"),
    ]
    .into_iter()
    .map(|(kind, description)| CreateCategoryPayload {
        kind,
        name: None,
        description: Some(description.to_string()),
    })
    .collect()
}

pub fn demo_assets() -> Vec<Asset> {
    vec![
        Asset {
            id: ANDROMEDA.to_string(),
            title: "Andromeda Galaxy Deep Field".to_string(),
            image_descriptor_path: "/tiles/DEMO_ANDROMEDA.dzi".to_string(),
            thumbnail_path: "/tiles/DEMO_ANDROMEDA_files/0/0_0.jpeg".to_string(),
            capture: CaptureInfo {
                instrument: Some("Wide Field Camera 3".to_string()),
                filter: Some("F814W".to_string()),
                captured_at: Some("2023-01-15T00:00:00.000000Z".to_string()),
                width: Some(4096),
                height: Some(4096),
            },
            meta: Some(json!({
                "description": "A deep field view of the Andromeda Galaxy",
                "exposure": "1200s",
                "telescope": "Hubble Space Telescope"
            })),
            created_at: "2024-01-01T00:00:00.000000Z".to_string(),
        },
        Asset {
            id: CASSINI_RINGS.to_string(),
            title: "Saturn's Rings - Cassini Grand Finale".to_string(),
            image_descriptor_path: "/ti.dzi".to_string(),
            thumbnail_path: "/ti_files/0/0_0.jpeg".to_string(),
            capture: CaptureInfo {
                instrument: Some("Imaging Science Subsystem".to_string()),
                filter: Some("UV3".to_string()),
                captured_at: Some("2017-09-15T00:00:00.000000Z".to_string()),
                width: Some(2048),
                height: Some(2048),
            },
            meta: Some(json!({
                "description": "Saturn's rings during the Cassini Grand Finale mission",
                "exposure": "60s",
                "spacecraft": "Cassini"
            })),
            created_at: "2024-01-02T00:00:00.000000Z".to_string(),
        },
        Asset {
            id: MESSIER_51.to_string(),
            title: "Messier 51 - The Whirlpool Galaxy".to_string(),
            image_descriptor_path: "/tiles/MESSIER_51.dzi".to_string(),
            thumbnail_path: "/tiles/MESSIER_51_files/0/0_0.jpeg".to_string(),
            capture: CaptureInfo {
                instrument: Some("Wide Field Camera 3".to_string()),
                filter: Some("F814W, F435W, F555W".to_string()),
                captured_at: Some("2021-05-15T00:00:00.000000Z".to_string()),
                width: Some(4096),
                height: Some(4096),
            },
            meta: Some(json!({
                "description": "The graceful, winding arms of the majestic spiral galaxy M51 appear like a grand spiral staircase sweeping through space.",
                "exposure": "2400s",
                "telescope": "Hubble Space Telescope",
                "distance": "31 million light-years",
                "constellation": "Canes Venatici",
                "magnitude": "8.4",
                "discovery": "Charles Messier, 1773"
            })),
            created_at: "2024-01-03T00:00:00.000000Z".to_string(),
        },
    ]
}

fn label(
    id: &str,
    asset_id: &str,
    rect: NormRect,
    title: &str,
    note: &str,
    category: SpaceCategory,
    confidence: f64,
) -> Label {
    Label {
        id: id.to_string(),
        asset_id: asset_id.to_string(),
        rect,
        title: title.to_string(),
        note: Some(note.to_string()),
        category,
        confidence,
        created_at: "2024-01-05T00:00:00.000000Z".to_string(),
    }
}

pub fn demo_labels() -> Vec<Label> {
    use SpaceCategory::*;
    vec![
        label("label_1", ANDROMEDA, NormRect::new(0.3, 0.4, 0.1, 0.1), "Star Cluster M31",
            "A dense cluster of young stars in Andromeda", Star, 0.95),
        label("label_2", ANDROMEDA, NormRect::new(0.6, 0.7, 0.15, 0.08), "Dust Lane",
            "Dark dust lane across the galaxy", Nebula, 0.87),
        label("label_3", CASSINI_RINGS, NormRect::new(0.2, 0.3, 0.2, 0.1), "Saturn's A Ring",
            "Outer ring system of Saturn", Planet, 0.92),
        label("m51_spiral_arms", MESSIER_51, NormRect::new(0.2, 0.3, 0.4, 0.3), "Spiral Arms",
            "The winding arms of M51 compress hydrogen gas and create clusters of new stars.", Galaxy, 0.98),
        label("m51_ngc5195", MESSIER_51, NormRect::new(0.7, 0.2, 0.15, 0.15), "NGC 5195",
            "The small companion galaxy tugging on M51's arm, triggering new star formation.", Galaxy, 0.96),
        label("m51_star_forming_regions", MESSIER_51, NormRect::new(0.4, 0.5, 0.2, 0.2), "Star-Forming Regions",
            "Red regions of infrared light and hydrogen where new stars are being born.", Nebula, 0.94),
        label("m51_young_stars", MESSIER_51, NormRect::new(0.3, 0.6, 0.15, 0.15), "Young Blue Stars",
            "Hot, young stars that recently formed in the spiral arms.", Star, 0.91),
        label("m51_galactic_center", MESSIER_51, NormRect::new(0.45, 0.45, 0.1, 0.1), "Galactic Center",
            "The bright core of M51, dominated by older yellow stars.", Galaxy, 0.97),
        label("m51_dust_lanes", MESSIER_51, NormRect::new(0.5, 0.3, 0.25, 0.1), "Dust Lanes",
            "Dark lanes of cosmic dust and gas where future stars will form.", Nebula, 0.89),
    ]
}

pub fn demo_comments() -> Vec<Comment> {
    let threads = [
        ("comment_1", CommentScope::Asset(ANDROMEDA.into()), "SpaceExplorer42",
            "Incredible detail in the spiral arms! The dust lanes are clearly visible."),
        ("comment_2", CommentScope::Label("label_1".into()), "AstroNerd",
            "This star cluster shows excellent resolution. Perfect for studying stellar evolution!"),
        ("comment_3", CommentScope::Asset(CASSINI_RINGS.into()), "CassiniFan",
            "The ring shadows are amazing! This was taken during the Grand Finale dive."),
        ("andromeda_comment_1", CommentScope::Asset(ANDROMEDA.into()), "GalaxyResearcher",
            "Andromeda is our closest major galactic neighbor at 2.5 million light-years away."),
        ("andromeda_comment_2", CommentScope::Asset(ANDROMEDA.into()), "HubbleObserver",
            "You can see individual stars in Andromeda's disk."),
        ("cassini_comment_1", CommentScope::Asset(CASSINI_RINGS.into()), "PlanetaryScientist",
            "The spacecraft made 22 daring dives between Saturn and its rings before its final plunge."),
        ("cassini_comment_2", CommentScope::Asset(CASSINI_RINGS.into()), "RingExpert",
            "Saturn's rings are only about 10 meters thick in some places, yet span 175,000 miles."),
        ("m51_comment_1", CommentScope::Asset(MESSIER_51.into()), "GalaxyHunter",
            "The interaction with NGC 5195 is clearly visible in the tidal forces affecting the spiral arms."),
        ("m51_comment_2", CommentScope::Label("m51_spiral_arms".into()), "SpiralGalaxyExpert",
            "Textbook grand-design spirals! You can see the red HII regions where new stars are being born."),
        ("m51_comment_3", CommentScope::Label("m51_ngc5195".into()), "GalacticDynamics",
            "The gravitational dance between these galaxies has been going on for hundreds of millions of years."),
        ("m51_comment_4", CommentScope::Label("m51_star_forming_regions".into()), "StarFormationResearcher",
            "Red hydrogen emission from HII regions where massive stars ionize the surrounding gas."),
        ("m51_comment_5", CommentScope::Asset(MESSIER_51.into()), "CosmicExplorer",
            "M51 is 31 million light-years away, so we see it as it was 31 million years ago."),
        ("m51_comment_6", CommentScope::Asset(MESSIER_51.into()), "HubbleFan",
            "You can actually see individual star clusters within the spiral arms."),
        ("m51_comment_7", CommentScope::Label("m51_young_stars".into()), "StellarAstronomer",
            "Those blue stars are massive O and B type stars with lifespans of only a few million years."),
        ("m51_comment_8", CommentScope::Asset(MESSIER_51.into()), "SpaceEducator",
            "M51 was the first galaxy recognized as having a spiral structure, by Lord Rosse in 1845."),
        ("m51_comment_9", CommentScope::Label("m51_dust_lanes".into()), "DustLaneExpert",
            "Those dark dust lanes are cosmic nurseries for the galaxy's future stars."),
        ("m51_comment_10", CommentScope::Asset(MESSIER_51.into()), "AmateurAstronomer",
            "I can see M51 with my 8-inch telescope from my backyard! Faint, but the spiral is visible."),
    ];

    threads
        .into_iter()
        .enumerate()
        .map(|(i, (id, scope, username, content))| Comment {
            id: id.to_string(),
            asset_id: scope.asset_id().map(str::to_string),
            label_id: scope.label_id().map(str::to_string),
            username: username.to_string(),
            content: content.to_string(),
            // Fixed, one minute apart, so reseeding writes the same keys.
            created_at: format!("2024-01-10T12:{:02}:00.000000Z", i),
        })
        .collect()
}

/// Writes the demo catalog. Records that already exist are counted as skipped.
pub async fn seed_demo_catalog(client: &DynamoClient, table_name: &str) -> AtomResult<SeedReport> {
    let mut report = SeedReport::default();

    for payload in demo_categories() {
        upsert_category(client, table_name, payload).await?;
    }

    for asset in demo_assets() {
        report.record(put_asset(client, table_name, &asset).await)?;
    }

    for label in demo_labels() {
        report.record(put_label(client, table_name, &label).await)?;
    }

    for comment in demo_comments() {
        let scope = comment
            .scope()
            .ok_or_else(|| AtomError::validation(format!("comment {} has no scope", comment.id)))?;
        let new_comment = NewComment::new(scope, &comment.username, &comment.content)?;
        let outcome = put_comment_at(client, table_name, new_comment, comment.id, comment.created_at)
            .await
            .map(|_| ());
        report.record(outcome)?;
    }

    tracing::info!(created = report.created, skipped = report.skipped, "demo catalog seeded");
    Ok(report)
}
