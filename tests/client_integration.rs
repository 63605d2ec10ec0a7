use ustrade_api::types::Cell;
use ustrade_api::{
    Client, CountryTable, Error, Granularity, Hs2NameTable, Hs2SectionTable, Period,
    ReferenceData, TradeQuery, Transport, Warning,
};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const EXPORTS_PATH: &str = "/data/timeseries/intltrade/exports/hs";
const IMPORTS_PATH: &str = "/data/timeseries/intltrade/imports/hs";

fn load_fixture(name: &str) -> String {
    std::fs::read_to_string(format!("tests/fixtures/{}", name)).unwrap()
}

fn refdata() -> ReferenceData {
    let countries =
        CountryTable::from_reader("ISO Code,Code\nGB,4120\nFR,4279\n".as_bytes()).unwrap();
    let names = Hs2NameTable::from_reader(
        "HS2,HS2_Name\n85,Electrical machinery\n09,Coffee and tea\n".as_bytes(),
    )
    .unwrap();
    let sections = Hs2SectionTable::from_reader(
        "HS2_Code,Section,Section_Title\n85,XVI,Machinery\n09,II,Vegetable products\n".as_bytes(),
    )
    .unwrap();
    ReferenceData::empty()
        .with_countries(countries)
        .with_hs2_names(names)
        .with_hs2_sections(sections)
}

#[tokio::test]
async fn get_exports_rolls_two_months_into_one_year_row() {
    let mock_server = MockServer::start().await;
    let body = load_fixture("exports.json");

    Mock::given(method("GET"))
        .and(path(EXPORTS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string(&body))
        .mount(&mock_server)
        .await;

    let client = Client::with_base_url(&mock_server.uri(), refdata());
    let query = TradeQuery::new("test-key")
        .with_country("GB")
        .with_year("2020")
        .with_month("01")
        .with_period(Period::Year)
        .with_granularity(Granularity::Hs2)
        .with_transport(Transport::Included);

    let result = client.get_exports(&query).await.unwrap();
    assert!(result.warnings.is_empty());

    let table = &result.table;
    assert_eq!(table.row_count(), 1);
    assert!(!table.has_column("MONTH"));
    assert!(!table.has_column("E_COMMODITY"));
    assert_eq!(table.cell(0, "YEAR"), Some(&Cell::Text("2020".into())));
    assert_eq!(table.cell(0, "HS2"), Some(&Cell::Text("85".into())));
    assert_eq!(
        table.cell(0, "HS2_Name"),
        Some(&Cell::Text("Electrical machinery".into()))
    );
    assert_eq!(table.cell(0, "ALL_VAL_MO"), Some(&Cell::Num(3000.0)));
    assert_eq!(table.cell(0, "AIR_VAL_MO"), Some(&Cell::Num(250.0)));
    assert_eq!(table.cell(0, "VES_VAL_MO"), Some(&Cell::Num(450.0)));
    assert_eq!(table.cell(0, "CNT_VAL_MO"), Some(&Cell::Num(650.0)));
}

#[tokio::test]
async fn query_parameters_reach_the_wire() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(EXPORTS_PATH))
        .and(query_param("key", "test-key"))
        .and(query_param("COMM_LVL", "HS2"))
        .and(query_param("CTY_CODE", "4120"))
        .and(query_param("YEAR", "2020"))
        .and(query_param("MONTH", "07"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"[["CTY_NAME"]]"#))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = Client::with_base_url(&mock_server.uri(), refdata());
    let query = TradeQuery::new("test-key")
        .with_country("gb")
        .with_year("2020")
        .with_month("7");

    let result = client.get_exports(&query).await.unwrap();
    assert!(result.table.is_empty());
}

#[tokio::test]
async fn get_imports_with_sections_and_no_transport() {
    let mock_server = MockServer::start().await;
    let body = load_fixture("imports.json");

    Mock::given(method("GET"))
        .and(path(IMPORTS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string(&body))
        .mount(&mock_server)
        .await;

    let client = Client::with_base_url(&mock_server.uri(), refdata());
    let query = TradeQuery::new("test-key")
        .with_country("FR")
        .with_year("2020")
        .with_granularity(Granularity::Hs2Section)
        .with_transport(Transport::Excluded);

    let result = client.get_imports(&query).await.unwrap();
    let table = &result.table;

    assert_eq!(table.row_count(), 2);
    assert!(table.has_column("MONTH"));
    assert!(!table.has_column("I_COMMODITY"));
    assert!(!table.has_column("AIR_VAL_MO"));
    assert!(!table.has_column("VES_VAL_MO"));
    assert!(!table.has_column("CNT_VAL_MO"));
    assert_eq!(table.cell(0, "GEN_VAL_MO"), Some(&Cell::Num(500.0)));
    assert_eq!(table.cell(0, "Section"), Some(&Cell::Text("II".into())));
    assert_eq!(
        table.cell(1, "Section_Title"),
        Some(&Cell::Text("Machinery".into()))
    );
}

#[tokio::test]
async fn server_error_surfaces_status_and_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(EXPORTS_PATH))
        .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
        .mount(&mock_server)
        .await;

    let client = Client::with_base_url(&mock_server.uri(), ReferenceData::empty());
    let err = client
        .get_exports(&TradeQuery::new("test-key"))
        .await
        .unwrap_err();
    match err {
        Error::HttpStatus { status, body } => {
            assert_eq!(status, 500);
            assert_eq!(body, "Internal Server Error");
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn malformed_json_is_a_decode_failure() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(EXPORTS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string("{not valid json}"))
        .mount(&mock_server)
        .await;

    let client = Client::with_base_url(&mock_server.uri(), ReferenceData::empty());
    let err = client
        .get_exports(&TradeQuery::new("test-key"))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Decode { .. }));
}

#[tokio::test]
async fn status_204_yields_an_empty_table() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(IMPORTS_PATH))
        .respond_with(ResponseTemplate::new(204))
        .mount(&mock_server)
        .await;

    let client = Client::with_base_url(&mock_server.uri(), ReferenceData::empty());
    let result = client
        .get_imports(&TradeQuery::new("test-key"))
        .await
        .unwrap();
    assert!(result.table.is_empty());
    assert!(result.warnings.is_empty());
}

#[tokio::test]
async fn empty_body_yields_an_empty_table_with_warning() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(EXPORTS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string(""))
        .mount(&mock_server)
        .await;

    let client = Client::with_base_url(&mock_server.uri(), ReferenceData::empty());
    let result = client
        .get_exports(&TradeQuery::new("test-key"))
        .await
        .unwrap();
    assert!(result.table.is_empty());
    assert_eq!(result.warnings, vec![Warning::EmptyBody]);
}

#[tokio::test]
async fn missing_api_key_fails_before_any_request() {
    let mock_server = MockServer::start().await;

    let client = Client::with_base_url(&mock_server.uri(), refdata());
    let err = client
        .get_exports(&TradeQuery::default())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::MissingApiKey));
    assert!(mock_server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn unknown_country_widens_the_query_with_warning() {
    let mock_server = MockServer::start().await;
    let body = load_fixture("exports.json");

    Mock::given(method("GET"))
        .and(path(EXPORTS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string(&body))
        .mount(&mock_server)
        .await;

    let client = Client::with_base_url(&mock_server.uri(), refdata());
    let query = TradeQuery::new("test-key").with_country("ZZ");

    let result = client.get_exports(&query).await.unwrap();
    assert!(result
        .warnings
        .contains(&Warning::UnknownCountry("ZZ".to_string())));
    assert_eq!(result.table.row_count(), 2);

    let request = &mock_server.received_requests().await.unwrap()[0];
    assert!(!request.url.query().unwrap().contains("CTY_CODE"));
}
