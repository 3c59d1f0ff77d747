//! Batch analysis verification: folder scanning, parallel analysis, per-file output.

use std::fs;
use tempfile::tempdir;
use pysift::api::dto::FileResponse;
use pysift::application::AnalyzeUsecase;
use pysift::infrastructure::concurrency::build_pool;
use pysift::infrastructure::config::Config;
use pysift::infrastructure::source_loader::SourceLoader;
use pysift::infrastructure::RustPythonParser;

#[test]
fn test_folder_batch_reports_each_file() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    fs::create_dir_all(root.join("pkg")).unwrap();
    fs::create_dir_all(root.join(".venv/lib")).unwrap();
    fs::write(root.join("pkg/good.py"), "import os\n\ndef run(x):\n    return x\n").unwrap();
    fs::write(root.join("pkg/bad.py"), "def broken(:\n    pass\n").unwrap();
    fs::write(root.join(".venv/lib/site.py"), "ignored = True\n").unwrap();

    let config = Config::default();
    let loader = SourceLoader::new(config.scan.exclude.clone());
    let paths = loader.collect(root).unwrap();
    assert_eq!(paths.len(), 2, "found: {:?}", paths);

    let files: Vec<_> = paths
        .iter()
        .map(|p| SourceLoader::read_file(p).unwrap())
        .collect();
    let pool = build_pool(2).unwrap();
    let usecase = AnalyzeUsecase::new(&RustPythonParser);
    let responses: Vec<FileResponse> = usecase
        .analyze_batch(&files, &pool)
        .into_iter()
        .map(FileResponse::from)
        .collect();

    // sorted: bad.py before good.py
    assert!(responses[0].path.ends_with("bad.py"));
    assert!(!responses[0].result.is_success());
    assert!(responses[1].path.ends_with("good.py"));
    assert!(responses[1].result.is_success());

    let json = serde_json::to_value(&responses).unwrap();
    assert_eq!(json[0]["success"], false);
    assert_eq!(json[0]["lineno"], 1);
    assert_eq!(json[1]["ast"]["functions"][0]["name"], "run");
    assert_eq!(json[1]["ast"]["functions"][0]["lineno"], 3);
    assert_eq!(json[1]["ast"]["imports"][0]["modules"][0], "os");
}

#[test]
fn test_batch_matches_single_file_analysis() {
    let sources = [
        "x = 1\n",
        "class A:\n    y = 2\n",
        "for i in j:\n    pass\n",
        "if (:\n",
    ];
    let files: Vec<_> = sources
        .iter()
        .enumerate()
        .map(|(i, s)| pysift::infrastructure::source_loader::SourceFile {
            path: format!("mem_{i}.py"),
            source: s.to_string(),
        })
        .collect();
    let usecase = AnalyzeUsecase::new(&RustPythonParser);
    let batch = usecase.analyze_batch(&files, &build_pool(3).unwrap());
    for (file, result) in files.iter().zip(batch) {
        assert_eq!(result.outcome, usecase.analyze(&file.source));
    }
}
