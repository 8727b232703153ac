mod common;

use anyhow::Result;
use reqwest::StatusCode;

#[tokio::test]
async fn health_reports_ok() -> Result<()> {
    let Some(server) = common::ensure_server().await? else {
        return Ok(());
    };

    let res = reqwest::get(format!("{}/health", server.base_url)).await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["status"], "ok");
    Ok(())
}

#[tokio::test]
async fn options_preflight_is_empty_ok() -> Result<()> {
    let Some(server) = common::ensure_server().await? else {
        return Ok(());
    };

    let res = reqwest::Client::new()
        .request(reqwest::Method::OPTIONS, format!("{}/?resource=assignments", server.base_url))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    assert!(res.text().await?.is_empty());
    Ok(())
}
