//! End-to-end session flows over the in-memory store and a mocked
//! generation endpoint.

use std::sync::Arc;
use std::time::Duration;

use remixcuisine::config::GeneratorConfig;
use remixcuisine::marketplace::ListingFilter;
use remixcuisine::{
    AnthropicGenerator, Badge, Error, MemoryStore, ProfileStore, RecipeRequest, RewardLedger,
    Session,
};
use tokio_test::{assert_err, assert_ok};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const RECIPE_TEXT: &str = r#"```json
{
  "title": "Harissa Roast Carrots",
  "description": "Sticky, spicy and bright",
  "difficulty": "Easy",
  "prep_time": 10,
  "cook_time": 30,
  "servings": 4,
  "ingredients": ["carrots", "harissa", "honey", "yogurt"],
  "steps": ["Toss carrots in harissa", "Roast at 220C", "Serve over yogurt"],
  "tips": "Use a mix of carrot colours",
  "nutrition": {"calories": 210, "protein": "5g", "carbs": "28g"}
}
```"#;

async fn mock_endpoint(text: &str) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "content": [{"type": "text", "text": text}]
        })))
        .mount(&server)
        .await;
    server
}

fn session_for(server: &MockServer, memory: &MemoryStore) -> Session {
    let config = GeneratorConfig {
        api_url: format!("{}/v1/messages", server.uri()),
        timeout: Duration::from_secs(5),
        ..GeneratorConfig::default()
    };
    Session::new(
        ProfileStore::new(Arc::new(memory.clone())),
        RewardLedger::new(),
        Arc::new(AnthropicGenerator::new(&config).unwrap()),
        "Anonymous Chef",
    )
}

#[tokio::test]
async fn generate_save_and_earn_amateur_chef() {
    let server = mock_endpoint(RECIPE_TEXT).await;
    let memory = MemoryStore::new("alice");
    let session = session_for(&server, &memory);

    let start = assert_ok!(session.bootstrap().await);
    assert_eq!(start.tokens, 100);
    assert_eq!(start.badges.len(), 1);

    let request = RecipeRequest::new("Mediterranean", "carrots, harissa");
    for round in 1..=5u32 {
        let generated = assert_ok!(session.generate_recipe(&request).await);
        assert_eq!(generated.recipe.title, "Harissa Roast Carrots");
        assert_eq!(generated.recipe.cuisine, "Mediterranean");

        let profile = assert_ok!(session.save_recipe(generated.recipe).await);
        assert_eq!(profile.recipes_created, round);
        assert_eq!(u64::from(round) * 15 + 100, profile.tokens);
    }

    let profile = assert_ok!(session.profile().await);
    assert!(profile.has_badge(Badge::AmateurChef));
    assert_eq!(assert_ok!(session.recipes().await).len(), 5);
}

#[tokio::test]
async fn profile_survives_a_new_session() {
    let server = mock_endpoint(RECIPE_TEXT).await;
    let memory = MemoryStore::new("alice");

    let first = session_for(&server, &memory);
    assert_ok!(first.bootstrap().await);
    let after_claim = assert_ok!(first.claim_daily().await);
    drop(first);

    let second = session_for(&server, &memory);
    let reloaded = assert_ok!(second.bootstrap().await);
    assert_eq!(reloaded, after_claim);
    assert!(matches!(second.claim_daily().await, Err(Error::AlreadyClaimed)));
}

#[tokio::test]
async fn malformed_generation_is_reported_without_reward() {
    let server = mock_endpoint("Here is a recipe: carrots. Enjoy!").await;
    let memory = MemoryStore::new("alice");
    let session = session_for(&server, &memory);
    assert_ok!(session.bootstrap().await);

    let err = assert_err!(
        session
            .generate_recipe(&RecipeRequest::new("French", "leeks"))
            .await
    );
    assert!(matches!(err, Error::GenerationParse { .. }));
    assert_eq!(assert_ok!(session.profile().await).tokens, 100);
}

#[tokio::test]
async fn marketplace_is_shared_but_purchases_are_private() {
    let server = mock_endpoint(RECIPE_TEXT).await;
    let alice_store = MemoryStore::new("alice");
    let bob_store = alice_store.for_owner("bob");

    let alice = session_for(&server, &alice_store);
    assert_ok!(alice.bootstrap().await);

    // Bob finds the marketplace Alice's first run seeded
    let bob = session_for(&server, &bob_store);
    let desserts = assert_ok!(
        bob.marketplace(&ListingFilter {
            category: Some("desserts".to_string()),
            search: None,
        })
        .await
    );
    assert_eq!(desserts.len(), 3);

    // Exotic Fruit Pavlova costs 85
    let profile = assert_ok!(alice.purchase(8).await);
    assert_eq!(profile.tokens, 15);
    assert_eq!(profile.nfts_owned, 1);

    // A second purchase is refused rather than clamped to zero
    let err = assert_err!(alice.purchase(8).await);
    assert!(matches!(err, Error::InsufficientBalance { .. }));
    assert_eq!(assert_ok!(alice.profile().await).tokens, 15);

    assert!(assert_ok!(bob.owned_collectibles().await).is_empty());
    assert_eq!(assert_ok!(alice.owned_collectibles().await).len(), 1);
}
