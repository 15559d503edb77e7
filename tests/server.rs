//! End-to-end tests for the HTTP API: a real server on a free port, queried
//! with reqwest.

use std::fs;
use std::path::Path;

use course_catalog::config::Config;
use course_catalog::server::run_server;
use tempfile::TempDir;

fn write(root: &Path, rel: &str, body: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, body).unwrap();
}

fn seed_docs(root: &Path) {
    write(
        root,
        "操作系统/mit6.s081.md",
        "# MIT6.S081: 操作系统工程

## 课程简介

- 所属大学：MIT
- 编程语言：C
- 课程难度：🌟🌟🌟🌟🌟
- 预计学时：150 小时

麻省理工的操作系统课，基于 xv6 完成一系列实验。
",
    );
    write(
        root,
        "操作系统/mit6.s081.en.md",
        "# MIT6.S081: Operating System Engineering

## Course Introduction

- Offered By: MIT
- Programming Language: C
- Difficulty: 🌟🌟🌟🌟🌟
- Class Hour: 150 hours

MIT's operating systems course built around the xv6 teaching kernel.
",
    );
    write(
        root,
        "编程入门/Python/cs61a.md",
        "# CS61A\n\n## 课程简介\n\n- 编程语言：Python\n- 课程难度：🌟🌟\n\n伯克利的编程入门课。\n",
    );
}

fn test_config(tmp: &TempDir, port: u16) -> Config {
    let docs = tmp.path().join("docs");
    seed_docs(&docs);
    let mut cfg = Config::for_root(docs);
    cfg.server.bind = format!("127.0.0.1:{}", port);
    cfg
}

fn find_free_port() -> u16 {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    listener.local_addr().unwrap().port()
}

async fn wait_for_server(port: u16) {
    let client = reqwest::Client::new();
    let url = format!("http://127.0.0.1:{}/health", port);
    for _ in 0..50 {
        tokio::time::sleep(std::time::Duration::from_millis(100)).await;
        if let Ok(resp) = client.get(&url).send().await {
            if resp.status().is_success() {
                return;
            }
        }
    }
    panic!("Server did not become ready within 5 seconds");
}

async fn start(tmp: &TempDir) -> (String, tokio::task::JoinHandle<()>) {
    let port = find_free_port();
    let cfg = test_config(tmp, port);
    let handle = tokio::spawn(async move {
        run_server(&cfg).await.ok();
    });
    wait_for_server(port).await;
    (format!("http://127.0.0.1:{}", port), handle)
}

// ─── Tests ──────────────────────────────────────────────────────────

#[tokio::test]
async fn test_health_reports_version() {
    let tmp = TempDir::new().unwrap();
    let (base, handle) = start(&tmp).await;

    let body: serde_json::Value = reqwest::get(format!("{}/health", base))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));

    handle.abort();
}

#[tokio::test]
async fn test_categories_omit_content() {
    let tmp = TempDir::new().unwrap();
    let (base, handle) = start(&tmp).await;

    let body: serde_json::Value = reqwest::get(format!("{}/api/categories", base))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let categories = body["categories"].as_array().unwrap();
    assert_eq!(categories.len(), 2);

    let os = categories
        .iter()
        .find(|c| c["slug"] == "operating-systems")
        .unwrap();
    let course = &os["courses"][0];
    assert_eq!(course["id"], "operating-systems--mit6-s081");
    assert_eq!(course["content"], "");
    assert!(course.get("contentEn").is_none());
    assert_eq!(course["hasEnglishVersion"], true);
    assert_eq!(course["difficulty"], "Advanced");
    assert_eq!(course["duration"]["value"], 150);
    assert_eq!(course["duration"]["originalText"], "150 hours");

    let resp = reqwest::get(format!("{}/api/categories/programming-intro", base))
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let intro: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(intro["subcategories"][0]["slug"], "python");

    let resp = reqwest::get(format!("{}/api/categories/nope", base))
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);
    let err: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(err["error"]["code"], "not_found");

    handle.abort();
}

#[tokio::test]
async fn test_course_page_per_locale() {
    let tmp = TempDir::new().unwrap();
    let (base, handle) = start(&tmp).await;
    let url = format!("{}/api/courses/operating-systems--mit6-s081", base);

    let zh: serde_json::Value = reqwest::get(&url).await.unwrap().json().await.unwrap();
    assert_eq!(zh["course"]["title"], "MIT6.S081: 操作系统工程");
    assert!(zh["html"].as_str().unwrap().contains("xv6"));
    assert!(zh["html"].as_str().unwrap().contains("麻省理工"));

    let en: serde_json::Value = reqwest::get(format!("{}?locale=en", url))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(en["course"]["titleEn"], "MIT6.S081: Operating System Engineering");
    assert!(en["html"].as_str().unwrap().contains("teaching kernel"));

    let resp = reqwest::get(format!("{}?locale=fr", url)).await.unwrap();
    assert_eq!(resp.status(), 400);

    let resp = reqwest::get(format!("{}/api/courses/missing", base))
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);

    handle.abort();
}

#[tokio::test]
async fn test_search_pages_and_validation() {
    let tmp = TempDir::new().unwrap();
    let (base, handle) = start(&tmp).await;
    let client = reqwest::Client::new();

    let page: serde_json::Value = client
        .get(format!("{}/api/search", base))
        .query(&[("q", "python")])
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(page["total"], 1);
    assert_eq!(page["page"], 1);
    assert_eq!(page["totalPages"], 1);
    assert_eq!(page["results"][0]["id"], "programming-intro--python--cs61a");
    // language (6) + subcategory (2)
    assert_eq!(page["results"][0]["score"], 8);

    let page: serde_json::Value = client
        .get(format!("{}/api/search", base))
        .query(&[("q", "mit"), ("locale", "en"), ("limit", "1")])
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(page["total"], 1);
    assert_eq!(
        page["results"][0]["title"],
        "MIT6.S081: Operating System Engineering"
    );

    let resp = client
        .get(format!("{}/api/search", base))
        .query(&[("q", "  ")])
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
    let err: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(err["error"]["code"], "bad_request");

    handle.abort();
}

#[tokio::test]
async fn test_rebuild_picks_up_new_files() {
    let tmp = TempDir::new().unwrap();
    let (base, handle) = start(&tmp).await;
    let client = reqwest::Client::new();
    let search_url = format!("{}/api/search?q=rustlings", base);

    let page: serde_json::Value = client.get(&search_url).send().await.unwrap().json().await.unwrap();
    assert_eq!(page["total"], 0);

    write(
        &tmp.path().join("docs"),
        "编程入门/rustlings.md",
        "# Rustlings\n\n## 课程简介\n\n- 编程语言：Rust\n\n小练习。\n",
    );

    // The cached index still predates the new file.
    let page: serde_json::Value = client.get(&search_url).send().await.unwrap().json().await.unwrap();
    assert_eq!(page["total"], 0);

    let rebuilt: serde_json::Value = client
        .post(format!("{}/api/search/rebuild", base))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(rebuilt["entries"], 3);
    assert!(rebuilt["builtAt"].is_string());

    let page: serde_json::Value = client.get(&search_url).send().await.unwrap().json().await.unwrap();
    assert_eq!(page["total"], 1);

    handle.abort();
}

#[cfg(unix)]
#[tokio::test]
async fn test_scan_failure_is_internal_error() {
    use std::os::unix::fs::PermissionsExt;

    let tmp = TempDir::new().unwrap();
    let (base, handle) = start(&tmp).await;

    let locked = tmp.path().join("docs/编程入门/Python");
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();
    if fs::read_dir(&locked).is_ok() {
        // Running with privileges that ignore permission bits.
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
        handle.abort();
        return;
    }

    let resp = reqwest::get(format!("{}/api/categories", base))
        .await
        .unwrap();
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

    assert_eq!(resp.status(), 500);
    let err: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(err["error"]["code"], "internal");
    assert!(err["error"]["message"].as_str().unwrap().contains("Python"));

    handle.abort();
}
