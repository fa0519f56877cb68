use xlsxporter_parse::CellValue;
use xlsxporter_sheet::{
    CsvSource, ParseOptions, SheetOutcome, SheetSource, Table, TableError, parse_table,
    parse_workbook,
};

const HEROES: &str = "\
id,name,pos,x,y,#,attrs,note
int,string,struct,float,float,,dict<int>:0,//memo
Hero,,,,,,server,
,,,,,,,
1,Arthur,,1.5,2,,str=5|agi=3,hi
// 9,Draft,,,,,,
2,Lancelot,,0.25,-1,,,
";

fn heroes(tag: &str) -> Table {
    let source = CsvSource::from_reader(HEROES.as_bytes()).unwrap();
    let rows = source.read_rows("Sheet1").unwrap();
    parse_table("hero.csv", "Sheet1", &rows, &ParseOptions::with_tag(tag)).unwrap()
}

#[test]
fn nested_struct_and_inline_dict() {
    let table = heroes("");
    assert_eq!(table.class_name, "Hero");
    assert_eq!(table.len(), 2);
    assert_eq!(table.skipped, 1);

    let arthur = table.record(1).unwrap();
    let pos = arthur.child("pos").unwrap();
    assert_eq!(pos.child("x").unwrap().data(), Some(&CellValue::Float(1.5)));
    assert_eq!(pos.child("y").unwrap().data(), Some(&CellValue::Float(2.0)));
    let attrs = arthur.child("attrs").unwrap();
    assert_eq!(attrs.child("agi").unwrap().data(), Some(&CellValue::Int(3)));
    assert_eq!(attrs.to_inline(), "str=5|agi=3");
    assert!(arthur.child("note").is_none());

    let lancelot = table.record(2).unwrap();
    assert!(lancelot.child("attrs").unwrap().children().is_empty());
    assert_eq!(
        lancelot.child("pos").unwrap().child("x").unwrap().data(),
        Some(&CellValue::Float(0.25))
    );
}

#[test]
fn client_export_drops_server_fields() {
    let table = heroes("client");
    assert!(table.record(1).unwrap().child("attrs").is_none());
    insta::assert_snapshot!(table.schema.tree(), @r"
    Hero : struct
      Hero.id : int
      Hero.name : string
      Hero.pos : struct
        Hero.pos.x : float
        Hero.pos.y : float
    ");
}

#[test]
fn transposed_csv_through_the_workbook_driver() {
    let vertical = "\
id,int,Hero,,1,2
name,string,,,Arthur,Lancelot
";
    let source = CsvSource::from_reader(vertical.as_bytes())
        .unwrap()
        .with_sheet_name("|Heroes");
    let reports = parse_workbook(&source, "hero.csv", &ParseOptions::default()).unwrap();
    assert_eq!(reports.len(), 1);
    let SheetOutcome::Parsed(table) = &reports[0].outcome else {
        panic!("sheet did not parse: {:?}", reports[0].outcome);
    };
    assert_eq!(table.sheet_name, "Heroes");
    assert_eq!(
        table.record(2).unwrap().child("name").unwrap().data(),
        Some(&CellValue::Text("Lancelot".into()))
    );
}

#[test]
fn bad_float_reports_its_cell() {
    let bad = HEROES.replace("0.25", "fast");
    let source = CsvSource::from_reader(bad.as_bytes()).unwrap();
    let rows = source.read_rows("Sheet1").unwrap();
    let err = parse_table("hero.csv", "Sheet1", &rows, &ParseOptions::default()).unwrap_err();
    let TableError::Decode { context, .. } = &err else {
        panic!("unexpected error: {err}");
    };
    assert_eq!(context.row, Some(7));
    assert_eq!(context.column, Some(4));
    assert_eq!(context.field.as_deref(), Some("Hero.pos.x"));
}
