use std::env;
use std::fs;
use std::path::Path;

fn main() {
    println!("cargo:rerun-if-changed=frontend/dist");

    let manifest_dir = env::var("CARGO_MANIFEST_DIR").unwrap();
    let dist_path = Path::new(&manifest_dir).join("frontend/dist");

    // rust-embed 要求目录存在
    if !dist_path.join("index.html").exists() {
        println!("cargo:warning=frontend/dist/index.html not found, embedding a placeholder page");
        create_placeholder(&dist_path);
    }
}

fn create_placeholder(dist_path: &Path) {
    fs::create_dir_all(dist_path).expect("Failed to create dist directory");

    let placeholder = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>%SYSTEM_NAME%</title>
</head>
<body style="font-family: sans-serif; max-width: 600px; margin: 80px auto; text-align: center;">
    <h1>%SYSTEM_NAME%</h1>
    <p>The web interface is not bundled with this build.</p>
    <p>The JSON API is available under <code>/api/v1</code>.</p>
</body>
</html>"#;

    fs::write(dist_path.join("index.html"), placeholder)
        .expect("Failed to write placeholder index.html");
}
