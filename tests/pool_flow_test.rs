use reqwest::Client;
use serde_json::json;

mod common;
use common::utils::{create_test_user_and_login, spawn_app};

async fn create_pool(
    client: &Client,
    address: &str,
    token: &str,
    body: serde_json::Value,
) -> serde_json::Value {
    let response = client
        .post(&format!("{}/pools", address))
        .bearer_auth(token)
        .json(&body)
        .send()
        .await
        .expect("Failed to create pool.");
    assert_eq!(response.status().as_u16(), 201);
    response.json().await.expect("Failed to parse pool response")
}

#[tokio::test]
#[ignore = "requires a running Postgres instance"]
async fn bowl_pool_report_score_and_leaderboard() {
    let app = spawn_app().await;
    let client = Client::new();
    let (_, commissioner_token) = create_test_user_and_login(&app.address).await;
    let (_, player_token) = create_test_user_and_login(&app.address).await;

    let pool = create_pool(
        &client,
        &app.address,
        &commissioner_token,
        json!({
            "name": "Bowl Season 2026",
            "kind": "bowl_picks",
            "advancement_rule": "against_spread"
        }),
    )
    .await;
    let pool_id = pool["data"]["id"].as_str().expect("No pool id").to_string();

    // Both users join
    for token in [&commissioner_token, &player_token] {
        let response = client
            .post(&format!("{}/pools/{}/entries", app.address, pool_id))
            .bearer_auth(token)
            .json(&json!({ "display_name": format!("entry-{}", uuid::Uuid::new_v4()) }))
            .send()
            .await
            .expect("Failed to join pool.");
        assert_eq!(response.status().as_u16(), 201);
    }

    // Commissioner adds a game with the higher side laying 7
    let response = client
        .post(&format!("{}/pools/{}/games", app.address, pool_id))
        .bearer_auth(&commissioner_token)
        .json(&json!({
            "round": 1,
            "slot": 1,
            "higher_team": "Alpha",
            "lower_team": "Omega",
            "spread": -7.0
        }))
        .send()
        .await
        .expect("Failed to create game.");
    assert_eq!(response.status().as_u16(), 201);
    let game: serde_json::Value = response.json().await.unwrap();
    let game_id = game["data"]["id"].as_str().expect("No game id").to_string();

    // Player takes the lower side
    let response = client
        .post(&format!("{}/pools/{}/picks", app.address, pool_id))
        .bearer_auth(&player_token)
        .json(&json!({
            "game_picks": [{ "game_id": game_id, "picked_side": "lower" }]
        }))
        .send()
        .await
        .expect("Failed to submit picks.");
    assert_eq!(response.status().as_u16(), 201);

    // Non-commissioner cannot report a score
    let response = client
        .put(&format!(
            "{}/pools/{}/games/{}/score",
            app.address, pool_id, game_id
        ))
        .bearer_auth(&player_token)
        .json(&json!({ "higher_score": 20, "lower_score": 17, "status": "final" }))
        .send()
        .await
        .expect("Failed to execute request.");
    assert_eq!(response.status().as_u16(), 403);

    // Commissioner reports 20-17: higher wins but lower covers
    let response = client
        .put(&format!(
            "{}/pools/{}/games/{}/score",
            app.address, pool_id, game_id
        ))
        .bearer_auth(&commissioner_token)
        .json(&json!({ "higher_score": 20, "lower_score": 17, "status": "final" }))
        .send()
        .await
        .expect("Failed to report score.");
    assert!(response.status().is_success());
    let reported: serde_json::Value = response.json().await.unwrap();
    assert_eq!(reported["data"]["verdict"]["winner"], "higher");
    assert_eq!(reported["data"]["verdict"]["covering_side"], "lower");
    assert_eq!(reported["data"]["verdict"]["is_upset"], true);

    // Player's spread pick on the lower side graded as a win
    let response = client
        .get(&format!("{}/pools/{}/leaderboard", app.address, pool_id))
        .bearer_auth(&player_token)
        .send()
        .await
        .expect("Failed to fetch leaderboard.");
    assert!(response.status().is_success());
    let leaderboard: serde_json::Value = response.json().await.unwrap();
    let rows = leaderboard["data"].as_array().expect("No leaderboard rows");
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["won"], 1);
    assert_eq!(rows[0]["lost"], 0);
}

#[tokio::test]
#[ignore = "requires a running Postgres instance"]
async fn pool_listing_paginates() {
    let app = spawn_app().await;
    let client = Client::new();
    let (_, token) = create_test_user_and_login(&app.address).await;

    for i in 1..=3 {
        create_pool(
            &client,
            &app.address,
            &token,
            json!({ "name": format!("Page Pool {}", i), "kind": "bowl_picks" }),
        )
        .await;
    }

    let response = client
        .get(&format!("{}/pools?limit=2&page=1", app.address))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to list pools.");
    let page_one: serde_json::Value = response.json().await.unwrap();
    assert_eq!(page_one["data"].as_array().unwrap().len(), 2);

    let response = client
        .get(&format!("{}/pools?limit=2&page=2", app.address))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to list pools.");
    let page_two: serde_json::Value = response.json().await.unwrap();
    assert_eq!(page_two["data"].as_array().unwrap().len(), 1);
}

#[tokio::test]
#[ignore = "requires a running Postgres instance"]
async fn game_lookups_are_scoped_to_their_pool() {
    let app = spawn_app().await;
    let client = Client::new();
    let (_, token) = create_test_user_and_login(&app.address).await;

    let pool_a = create_pool(
        &client,
        &app.address,
        &token,
        json!({ "name": "Scope A", "kind": "bowl_picks" }),
    )
    .await;
    let pool_a_id = pool_a["data"]["id"].as_str().unwrap().to_string();
    let pool_b = create_pool(
        &client,
        &app.address,
        &token,
        json!({ "name": "Scope B", "kind": "squares" }),
    )
    .await;
    let pool_b_id = pool_b["data"]["id"].as_str().unwrap().to_string();

    let response = client
        .post(&format!("{}/pools/{}/games", app.address, pool_a_id))
        .bearer_auth(&token)
        .json(&json!({
            "round": 1,
            "slot": 1,
            "higher_team": "Alpha",
            "lower_team": "Omega"
        }))
        .send()
        .await
        .unwrap();
    let game: serde_json::Value = response.json().await.unwrap();
    let game_id = game["data"]["id"].as_str().unwrap().to_string();

    // The game resolves under its own pool
    let response = client
        .get(&format!(
            "{}/pools/{}/games/{}/verdict",
            app.address, pool_a_id, game_id
        ))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());

    // Under any other pool it is a 404
    let response = client
        .get(&format!(
            "{}/pools/{}/games/{}/verdict",
            app.address, pool_b_id, game_id
        ))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 404);

    let response = client
        .get(&format!(
            "{}/pools/{}/games/{}/winning-square",
            app.address, pool_b_id, game_id
        ))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 404);
}

#[tokio::test]
#[ignore = "requires a running Postgres instance"]
async fn team_change_preview_counts_downstream_picks() {
    let app = spawn_app().await;
    let client = Client::new();
    let (_, commissioner_token) = create_test_user_and_login(&app.address).await;
    let (_, player_token) = create_test_user_and_login(&app.address).await;

    let pool = create_pool(
        &client,
        &app.address,
        &commissioner_token,
        json!({ "name": "Playoff Bracket", "kind": "cfp_bracket" }),
    )
    .await;
    let pool_id = pool["data"]["id"].as_str().unwrap().to_string();

    let response = client
        .post(&format!("{}/pools/{}/entries", app.address, pool_id))
        .bearer_auth(&player_token)
        .json(&json!({ "display_name": "Player" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 201);

    // Semifinal at slot 1 feeds the final at slot 3
    let mut game_ids = Vec::new();
    for (slot, next_slot) in [(1, Some(3)), (3, None)] {
        let response = client
            .post(&format!("{}/pools/{}/games", app.address, pool_id))
            .bearer_auth(&commissioner_token)
            .json(&json!({
                "round": if slot == 1 { 1 } else { 2 },
                "slot": slot,
                "next_slot": next_slot,
                "higher_team": "Alpha",
                "lower_team": "Omega"
            }))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status().as_u16(), 201);
        let game: serde_json::Value = response.json().await.unwrap();
        game_ids.push(game["data"]["id"].as_str().unwrap().to_string());
    }

    // One pick on the semifinal, one on the final
    let response = client
        .post(&format!("{}/pools/{}/picks", app.address, pool_id))
        .bearer_auth(&player_token)
        .json(&json!({
            "game_picks": [
                { "game_id": game_ids[0], "picked_side": "higher" },
                { "game_id": game_ids[1], "picked_side": "lower" }
            ]
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 201);

    // Preview counts the downstream game's pick too
    let response = client
        .get(&format!(
            "{}/pools/{}/games/{}/team-change",
            app.address, pool_id, game_ids[0]
        ))
        .bearer_auth(&commissioner_token)
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());
    let preview: serde_json::Value = response.json().await.unwrap();
    assert_eq!(preview["data"]["dependent_picks"], 2);
    assert_eq!(preview["data"]["downstream_games"], 1);

    // Confirm applies exactly what the preview disclosed
    let response = client
        .put(&format!(
            "{}/pools/{}/games/{}/team-change",
            app.address, pool_id, game_ids[0]
        ))
        .bearer_auth(&commissioner_token)
        .json(&json!({ "side": "higher", "new_team": "Gamma" }))
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());
    let applied: serde_json::Value = response.json().await.unwrap();
    assert_eq!(applied["data"], preview["data"]);

    // Every counted pick is gone
    let response = client
        .get(&format!("{}/pools/{}/picks/mine", app.address, pool_id))
        .bearer_auth(&player_token)
        .send()
        .await
        .unwrap();
    let picks: serde_json::Value = response.json().await.unwrap();
    assert_eq!(picks["data"].as_array().unwrap().len(), 0);
}

#[tokio::test]
#[ignore = "requires a running Postgres instance"]
async fn cyclic_slot_linkage_is_rejected_or_terminates() {
    let app = spawn_app().await;
    let client = Client::new();
    let (_, token) = create_test_user_and_login(&app.address).await;

    let pool = create_pool(
        &client,
        &app.address,
        &token,
        json!({ "name": "Loop Check", "kind": "cfp_bracket" }),
    )
    .await;
    let pool_id = pool["data"]["id"].as_str().unwrap().to_string();

    // A game cannot feed itself
    let response = client
        .post(&format!("{}/pools/{}/games", app.address, pool_id))
        .bearer_auth(&token)
        .json(&json!({
            "round": 1,
            "slot": 1,
            "next_slot": 1,
            "higher_team": "Alpha",
            "lower_team": "Omega"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 400);

    // A two-game cycle can still be assembled; the walks must terminate
    let mut game_ids = Vec::new();
    for (slot, next_slot) in [(1, 2), (2, 1)] {
        let response = client
            .post(&format!("{}/pools/{}/games", app.address, pool_id))
            .bearer_auth(&token)
            .json(&json!({
                "round": slot,
                "slot": slot,
                "next_slot": next_slot,
                "higher_team": "Alpha",
                "lower_team": "Omega"
            }))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status().as_u16(), 201);
        let game: serde_json::Value = response.json().await.unwrap();
        game_ids.push(game["data"]["id"].as_str().unwrap().to_string());
    }

    let response = client
        .get(&format!(
            "{}/pools/{}/games/{}/team-change",
            app.address, pool_id, game_ids[0]
        ))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());

    let response = client
        .put(&format!(
            "{}/pools/{}/games/{}/score",
            app.address, pool_id, game_ids[0]
        ))
        .bearer_auth(&token)
        .json(&json!({ "higher_score": 24, "lower_score": 17, "status": "final" }))
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());
}

#[tokio::test]
#[ignore = "requires a running Postgres instance"]
async fn ties_at_final_are_rejected() {
    let app = spawn_app().await;
    let client = Client::new();
    let (_, token) = create_test_user_and_login(&app.address).await;

    let pool = create_pool(
        &client,
        &app.address,
        &token,
        json!({ "name": "Tie Check", "kind": "bowl_picks" }),
    )
    .await;
    let pool_id = pool["data"]["id"].as_str().unwrap().to_string();

    let response = client
        .post(&format!("{}/pools/{}/games", app.address, pool_id))
        .bearer_auth(&token)
        .json(&json!({
            "round": 1,
            "slot": 1,
            "higher_team": "Alpha",
            "lower_team": "Omega"
        }))
        .send()
        .await
        .unwrap();
    let game: serde_json::Value = response.json().await.unwrap();
    let game_id = game["data"]["id"].as_str().unwrap().to_string();

    let response = client
        .put(&format!(
            "{}/pools/{}/games/{}/score",
            app.address, pool_id, game_id
        ))
        .bearer_auth(&token)
        .json(&json!({ "higher_score": 21, "lower_score": 21, "status": "final" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 400);
}

#[tokio::test]
#[ignore = "requires a running Postgres instance"]
async fn squares_pool_claim_shuffle_and_winner() {
    let app = spawn_app().await;
    let client = Client::new();
    let (_, commissioner_token) = create_test_user_and_login(&app.address).await;

    let pool = create_pool(
        &client,
        &app.address,
        &commissioner_token,
        json!({ "name": "Big Game Squares", "kind": "squares" }),
    )
    .await;
    let pool_id = pool["data"]["id"].as_str().unwrap().to_string();

    let response = client
        .post(&format!("{}/pools/{}/entries", app.address, pool_id))
        .bearer_auth(&commissioner_token)
        .json(&json!({ "display_name": "Commish" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 201);

    // Claim every square so the winner is ours regardless of shuffle
    for row in 0..10 {
        for col in 0..10 {
            let response = client
                .post(&format!("{}/pools/{}/squares", app.address, pool_id))
                .bearer_auth(&commissioner_token)
                .json(&json!({ "row_idx": row, "col_idx": col }))
                .send()
                .await
                .unwrap();
            assert_eq!(response.status().as_u16(), 201);
        }
    }

    // Double-claiming is a conflict
    let response = client
        .post(&format!("{}/pools/{}/squares", app.address, pool_id))
        .bearer_auth(&commissioner_token)
        .json(&json!({ "row_idx": 0, "col_idx": 0 }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 409);

    let response = client
        .post(&format!("{}/pools/{}/squares/digits", app.address, pool_id))
        .bearer_auth(&commissioner_token)
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());

    // Shuffle runs exactly once
    let response = client
        .post(&format!("{}/pools/{}/squares/digits", app.address, pool_id))
        .bearer_auth(&commissioner_token)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 409);

    // Claims are closed once the digits are known
    let response = client
        .post(&format!("{}/pools/{}/squares", app.address, pool_id))
        .bearer_auth(&commissioner_token)
        .json(&json!({ "row_idx": 0, "col_idx": 1 }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 409);

    let response = client
        .post(&format!("{}/pools/{}/games", app.address, pool_id))
        .bearer_auth(&commissioner_token)
        .json(&json!({
            "round": 1,
            "slot": 1,
            "higher_team": "Alpha",
            "lower_team": "Omega"
        }))
        .send()
        .await
        .unwrap();
    let game: serde_json::Value = response.json().await.unwrap();
    let game_id = game["data"]["id"].as_str().unwrap().to_string();

    let response = client
        .put(&format!(
            "{}/pools/{}/games/{}/score",
            app.address, pool_id, game_id
        ))
        .bearer_auth(&commissioner_token)
        .json(&json!({ "higher_score": 24, "lower_score": 17, "status": "final" }))
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());

    let response = client
        .get(&format!(
            "{}/pools/{}/games/{}/winning-square",
            app.address, pool_id, game_id
        ))
        .bearer_auth(&commissioner_token)
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());
    let winner: serde_json::Value = response.json().await.unwrap();
    assert!(winner["data"]["owner_entry_id"].is_string());
}
