// End-to-end: store on disk -> session with imports -> saved store -> reload

use sales_keeper::{
    load_all_sales, Command, Field, ImportOutcome, Importer, Prompter, SalesCollection,
    SalesConfig, Session,
};
use std::fs;
use std::io::Cursor;
use tempfile::tempdir;

#[test]
fn scripted_session_imports_and_saves() {
    let dir = tempdir().unwrap();
    let config = SalesConfig::in_dir(dir.path());

    fs::write(config.all_sales_path(), "1540.0,2020-01-15,w\n2000\n300.5,2020-04-02,c\n").unwrap();
    fs::write(dir.path().join("sales_q2_2021_w.csv"), "1200,2021-04-10\n950.5,2021-06-30\n").unwrap();
    fs::write(dir.path().join("sales_q3_2021_w.csv"), "100,2021-07-01\nabc,2021-09-31\n").unwrap();

    let script = [
        "import", "region1",
        "import", "sales_q1_2021_x.csv",
        "import", "sales_q2_2021_w.csv",
        "import", "sales_q3_2021_w.csv",
        "import", "sales_q2_2021_w.csv",
        "add2", "75", "2021-12-24", "e",
        "exit",
    ]
    .join("\n")
        + "\n";

    let prompter = Prompter::new(Cursor::new(script.into_bytes()), Vec::<u8>::new());
    let mut session = Session::open(&config, prompter).unwrap();
    session.run().unwrap();

    let (sales, prompter) = session.into_parts();
    let shown = String::from_utf8(prompter.into_output()).unwrap();

    assert!(shown.contains("Skipping incomplete row: [\"2000\"]"));
    assert!(shown.contains("Filename 'region1' doesn't follow the expected format of 'sales_qn_yyyy_r.csv'."));
    assert!(shown.contains("Filename 'sales_q1_2021_x.csv' doesn't include one of the following region codes"));
    assert!(shown.contains("File 'sales_q3_2021_w.csv' contains bad data."));
    assert!(shown.contains("File 'sales_q2_2021_w.csv' has already been imported."));
    assert!(shown.contains("Sales for 2021-12-24 is added."));

    // 2 from the store, 2 from the clean import, 1 manual
    assert_eq!(sales.len(), 5);

    assert_eq!(
        fs::read_to_string(config.ledger_path()).unwrap(),
        "sales_q2_2021_w.csv\n"
    );

    let reloaded = load_all_sales(&config.all_sales_path(), b',', &mut Vec::<u8>::new()).unwrap();
    assert_eq!(reloaded.len(), 5);
    for (before, after) in sales.iter().zip(reloaded.iter()) {
        let a = *before.amount.valid().unwrap();
        let b = *after.amount.valid().unwrap();
        assert!((a - b).abs() < 1e-9);
        assert_eq!(before.date_text(), after.date_text());
        assert_eq!(before.region, after.region);
    }
    assert_eq!(reloaded.records()[2].region, "West");
    assert_eq!(reloaded.records()[4].region, "East");
}

#[test]
fn ledger_survives_between_sessions() {
    let dir = tempdir().unwrap();
    let config = SalesConfig::in_dir(dir.path());
    fs::write(dir.path().join("sales_q4_2021_m.csv"), "10,2021-10-10\n").unwrap();

    let mut first = SalesCollection::new();
    let outcome = Importer::new(&config)
        .unwrap()
        .import_named("sales_q4_2021_m.csv", &mut first, &mut Vec::<u8>::new())
        .unwrap();
    assert!(outcome.is_imported());
    assert_eq!(first.records()[0].amount, Field::Valid(10.0));

    // A fresh importer reads the ledger back from disk
    let mut second = SalesCollection::new();
    let outcome = Importer::new(&config)
        .unwrap()
        .import_named("sales_q4_2021_m.csv", &mut second, &mut Vec::<u8>::new())
        .unwrap();
    assert_eq!(
        outcome,
        ImportOutcome::AlreadyImported {
            filename: "sales_q4_2021_m.csv".to_string()
        }
    );
    assert!(second.is_empty());
}

#[test]
fn view_command_reports_total() {
    let dir = tempdir().unwrap();
    let config = SalesConfig::in_dir(dir.path());
    fs::write(config.all_sales_path(), "100,2021-01-01,w\n50,2021-02-01,m\n").unwrap();

    let prompter = Prompter::new(Cursor::new(Vec::<u8>::new()), Vec::<u8>::new());
    let mut session = Session::open(&config, prompter).unwrap();
    assert!(session.execute(Command::View).unwrap());

    let (_, prompter) = session.into_parts();
    let shown = String::from_utf8(prompter.into_output()).unwrap();
    assert!(shown.contains("TOTAL"));
    assert!(shown.contains("150.00"));
}
