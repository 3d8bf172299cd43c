use contactbook_core::{AddressBook, BookError, LoadOutcome, Record};

fn sample_book() -> AddressBook {
    let mut book = AddressBook::new();

    let mut alice = Record::new("Alice", Some("15-03-1990")).unwrap();
    alice.add_phone("1234567890").unwrap();
    alice.add_phone("5555555555").unwrap();
    book.add_record(alice);

    let mut olena = Record::new("Олена", None).unwrap();
    olena.add_phone("0501234567").unwrap();
    book.add_record(olena);

    book
}

#[test]
fn test_save_and_reload_across_instances() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("address_book.json");

    // First instance: save
    {
        let book = sample_book();
        assert_eq!(book.save(&path)?, 2);
    }

    // Second instance: everything survived, in order
    {
        let mut book = AddressBook::new();
        assert_eq!(book.load(&path)?, LoadOutcome::Loaded(2));
        assert_eq!(book, sample_book());

        let names: Vec<&str> = book.iter().map(|r| r.name().as_str()).collect();
        assert_eq!(names, ["Alice", "Олена"]);
    }

    Ok(())
}

#[test]
fn test_saved_file_layout() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("book.json");
    sample_book().save(&path)?;

    let value: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&path)?)?;
    assert_eq!(
        value,
        serde_json::json!([
            {"name": "Alice", "phones": ["1234567890", "5555555555"], "birthday": "15-03-1990"},
            {"name": "Олена", "phones": ["0501234567"], "birthday": null}
        ])
    );

    Ok(())
}

#[test]
fn test_save_overwrites_existing_file() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("book.json");

    sample_book().save(&path)?;
    AddressBook::new().save(&path)?;

    let mut book = sample_book();
    assert_eq!(book.load(&path)?, LoadOutcome::Loaded(0));
    assert!(book.is_empty());

    Ok(())
}

#[test]
fn test_load_replaces_previous_contents() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("book.json");

    let mut other = AddressBook::new();
    other.add_record(Record::new("Bob", None)?);
    other.save(&path)?;

    let mut book = sample_book();
    book.load(&path)?;
    assert_eq!(book.len(), 1);
    assert!(book.find("bob").is_some());
    assert!(book.find("alice").is_none());

    Ok(())
}

#[test]
fn test_load_missing_keeps_store_empty() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let mut book = AddressBook::new();

    assert_eq!(book.load(&dir.path().join("missing.json"))?, LoadOutcome::Missing);
    assert!(book.is_empty());

    Ok(())
}

#[test]
fn test_save_into_missing_directory_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("no").join("such").join("book.json");

    let err = sample_book().save(&path).unwrap_err();
    assert!(matches!(err, BookError::Io { .. }));
}

#[test]
fn test_corrupt_file_leaves_store_untouched() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("book.json");
    std::fs::write(&path, "not json at all")?;

    let mut book = sample_book();
    let err = book.load(&path).unwrap_err();
    assert!(matches!(err, BookError::Serialization { .. }));
    assert_eq!(book, sample_book());

    Ok(())
}

#[test]
fn test_invalid_record_in_file_leaves_store_untouched() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("book.json");
    std::fs::write(
        &path,
        r#"[{"name": "Good", "phones": [], "birthday": null},
            {"name": "Bad", "phones": ["12"], "birthday": null}]"#,
    )?;

    let mut book = sample_book();
    assert!(book.load(&path).unwrap_err().is_invalid_format());
    assert_eq!(book, sample_book());

    Ok(())
}
