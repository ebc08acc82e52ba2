//! Deterministic provider payloads served in mock mode.
//!
//! Payloads use the vendors' own document shapes so the normalization path
//! is identical in mock and live mode.

use chrono::Utc;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::screening::{generate_screening_id, ScreeningListInfo};

/// D-U-N-S number of the well-known sample company.
pub const SAMPLE_DUNS: &str = "804735132";

fn timestamp() -> String {
    Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string()
}

/// Vendor transaction envelope attached to every registry response.
pub fn transaction_detail(application_id: Option<&str>) -> Value {
    json!({
        "ApplicationTransactionID": application_id
            .map(str::to_string)
            .unwrap_or_else(|| Uuid::new_v4().to_string()),
        "ServiceTransactionID": Uuid::new_v4().to_string(),
        "TransactionTimestamp": timestamp(),
    })
}

fn success() -> Value {
    json!({ "ResultID": "CM000", "ResultText": "Success" })
}

fn organization(duns: &str, name: &str, street: &str, town: &str, postal: &str, territory: &str) -> Value {
    json!({
        "DUNSNumber": duns,
        "OrganizationName": {
            "OrganizationPrimaryName": [{ "OrganizationName": name }]
        },
        "PrimaryAddress": {
            "StreetAddressLine": [{ "LineText": street }],
            "PrimaryTownName": town,
            "CountryISOAlpha2Code": "US",
            "PostalCode": postal,
            "TerritoryAbbreviatedName": territory
        }
    })
}

pub fn company_search(subject_name: &str) -> Value {
    let (mut org, grade, confidence) = if subject_name.to_uppercase().contains("GORMAN") {
        (
            organization(
                SAMPLE_DUNS,
                "GORMAN MANUFACTURING COMPANY, INC.",
                "492 KOLLER ST",
                "SAN FRANCISCO",
                "94110",
                "CA",
            ),
            "A",
            10,
        )
    } else {
        (
            organization(
                "123456789",
                &subject_name.to_uppercase(),
                "123 MAIN ST",
                "NEW YORK",
                "10001",
                "NY",
            ),
            "B",
            8,
        )
    };
    org["MatchQualityInformation"] = json!({
        "ConfidenceCode": confidence,
        "MatchGradeText": grade
    });

    json!({
        "MatchResponse": {
            "TransactionDetail": transaction_detail(Some("REST")),
            "TransactionResult": success(),
            "MatchCandidate": [{
                "Organization": org,
                "MatchGrade": grade,
                "ConfidenceCode": confidence
            }]
        }
    })
}

pub fn company_profile(duns: &str) -> Value {
    let org = if duns == SAMPLE_DUNS {
        let mut org = organization(
            SAMPLE_DUNS,
            "GORMAN MANUFACTURING COMPANY, INC.",
            "492 KOLLER ST",
            "SAN FRANCISCO",
            "94110",
            "CA",
        );
        org["Telecommunication"] = json!([{
            "TelecommunicationNumber": "4155551234",
            "TelecommunicationNumberType": "Telephone"
        }]);
        org["EmployeeQuantity"] = json!(250);
        org["SalesRevenueAmount"] = json!(45_000_000.0);
        org["BusinessDescription"] = json!(
            "Manufacturer of precision metal components and assemblies for aerospace and defense industries."
        );
        org["OperatingStatusText"] = json!("Active");
        org["StartDate"] = json!("1985-03-15");
        org["StockExchangeDetails"] = json!({
            "StockExchangeName": "NASDAQ",
            "StockTickerSymbol": "GORM"
        });
        org["FinancialStatement"] = json!([{
            "StatementDate": "2023-12-31",
            "Currency": "USD",
            "Revenue": 45_000_000.0,
            "NetIncome": 3_500_000.0,
            "TotalAssets": 28_000_000.0
        }]);
        org
    } else {
        let mut org = organization(
            duns,
            "SAMPLE COMPANY INC.",
            "100 BUSINESS PARK DR",
            "CHICAGO",
            "60601",
            "IL",
        );
        org["Telecommunication"] = json!([{
            "TelecommunicationNumber": "3125551234",
            "TelecommunicationNumberType": "Telephone"
        }]);
        org["EmployeeQuantity"] = json!(150);
        org["SalesRevenueAmount"] = json!(25_000_000.0);
        org["BusinessDescription"] = json!("Provider of business services and solutions.");
        org["OperatingStatusText"] = json!("Active");
        org["StartDate"] = json!("2000-01-01");
        org
    };

    json!({
        "OrderProductResponse": {
            "TransactionDetail": transaction_detail(Some("REST")),
            "TransactionResult": success(),
            "OrderProductResponseDetail": {
                "InquiryDetail": { "DUNSNumber": duns },
                "Product": { "Organization": org }
            }
        }
    })
}

fn statement(year: u16, assets: f64, liabilities: f64, revenue: f64, net_income: f64) -> Value {
    json!({
        "StatementDate": format!("{year}-12-31"),
        "Currency": "USD",
        "FiscalYear": year,
        "BalanceSheet": {
            "TotalAssets": assets,
            "TotalLiabilities": liabilities,
            "NetWorth": assets - liabilities
        },
        "IncomeStatement": {
            "Revenue": revenue,
            "GrossProfit": revenue * 0.4,
            "NetIncome": net_income
        }
    })
}

pub fn financial_statements(duns: &str) -> Value {
    json!({
        "TransactionDetail": transaction_detail(Some("REST")),
        "TransactionResult": success(),
        "DUNSNumber": duns,
        "FinancialStatements": [
            statement(2023, 28_000_000.0, 12_000_000.0, 45_000_000.0, 3_500_000.0),
            statement(2022, 25_000_000.0, 11_000_000.0, 42_000_000.0, 3_200_000.0)
        ]
    })
}

pub fn analytics(duns: &str) -> Value {
    let now = timestamp();
    json!({
        "TransactionDetail": transaction_detail(Some("REST")),
        "TransactionResult": success(),
        "DUNSNumber": duns,
        "RiskScores": [
            {
                "ScoreType": "Commercial Credit Score",
                "ScoreValue": 75,
                "ScoreDate": now,
                "RiskLevel": "Low-Medium",
                "ScoreDescription": "Score ranges from 1-100, with higher scores indicating lower risk"
            },
            {
                "ScoreType": "Financial Stress Score",
                "ScoreValue": 1250,
                "ScoreDate": now,
                "RiskLevel": "Low",
                "ScoreDescription": "Score ranges from 1001-1875, with higher scores indicating lower financial stress"
            }
        ],
        "PredictiveIndicators": [
            {
                "IndicatorType": "Payment Trend",
                "IndicatorValue": "Stable",
                "IndicatorDescription": "Payment behavior has been consistent over the past 12 months"
            },
            {
                "IndicatorType": "Industry Risk",
                "IndicatorValue": "Medium",
                "IndicatorDescription": "Industry shows moderate volatility"
            }
        ]
    })
}

fn screening_response(reference_id: &str, matches: Vec<Value>, processing_time: f64) -> Value {
    json!({
        "ScreeningResponse": {
            "ScreeningId": generate_screening_id(),
            "ReferenceId": reference_id,
            "Status": "COMPLETED",
            "Matches": matches,
            "ProcessingTime": processing_time
        }
    })
}

/// Person fixture picked by name: head-of-state names hit sanctions and PEP
/// lists, fraud keywords hit adverse media, everyone else is clean.
pub fn person_screening(full_name: &str, reference_id: &str) -> Value {
    let upper = full_name.to_uppercase();

    if upper.contains("PUTIN") || upper.contains("KIM JONG") {
        screening_response(
            reference_id,
            vec![
                json!({
                    "EntityId": "PEP-RU-001",
                    "Score": 95,
                    "Name": full_name,
                    "Aliases": ["Vladimir Vladimirovich Putin"],
                    "Categories": ["PEP", "SANCTIONS"],
                    "ListName": "OFAC SDN List",
                    "ListType": "SANCTIONS",
                    "Country": "RU",
                    "DOB": "1952-10-07",
                    "Nationality": "RU",
                    "Description": "Designated under Executive Order 14024.",
                    "LastUpdated": "2024-02-24"
                }),
                json!({
                    "EntityId": "PEP-RU-002",
                    "Score": 0.93,
                    "Name": full_name,
                    "Categories": ["politically-exposed-person"],
                    "ListName": "World-Check PEP Database",
                    "ListType": "PEP",
                    "Country": "RU",
                    "Description": "Head of State",
                    "LastUpdated": "2024-01-15"
                }),
            ],
            1.23,
        )
    } else if upper.contains("FRAUD") || upper.contains("CRIMINAL") {
        screening_response(
            reference_id,
            vec![json!({
                "EntityId": "AM-001",
                "Score": 720,
                "Name": full_name,
                "Categories": ["ADVERSE_MEDIA"],
                "ListName": "Adverse Media Database",
                "ListType": "ADVERSE_MEDIA",
                "Country": "US",
                "Description": "Involved in financial fraud investigation (2023)",
                "LastUpdated": "2023-11-20"
            })],
            0.89,
        )
    } else {
        screening_response(reference_id, Vec::new(), 0.45)
    }
}

pub fn entity_screening(entity_name: &str, reference_id: &str) -> Value {
    let upper = entity_name.to_uppercase();

    if ["ROSNEFT", "GAZPROM", "BANK OF"].iter().any(|k| upper.contains(k)) {
        screening_response(
            reference_id,
            vec![
                json!({
                    "EntityId": "ENT-SANC-001",
                    "Score": 98,
                    "Name": entity_name,
                    "Categories": ["SANCTIONS"],
                    "ListName": "EU Sanctions List",
                    "ListType": "SANCTIONS",
                    "Country": "RU",
                    "Description": "State-owned company subject to EU sanctions.",
                    "LastUpdated": "2024-03-01"
                }),
                json!({
                    "EntityId": "ENT-SANC-002",
                    "Score": 960,
                    "Name": entity_name,
                    "Categories": ["sanction"],
                    "ListName": "OFAC SDN List",
                    "ListType": "SANCTIONS",
                    "Country": "RU",
                    "Description": "Designated under sectoral sanctions",
                    "LastUpdated": "2024-02-15"
                }),
            ],
            1.05,
        )
    } else {
        screening_response(reference_id, Vec::new(), 0.52)
    }
}

pub fn screening_lists() -> Vec<ScreeningListInfo> {
    let list = |name: &str, kind: &str, description: &str, country: Option<&str>, updated: &str| {
        ScreeningListInfo {
            list_name: name.to_string(),
            list_type: kind.to_string(),
            description: description.to_string(),
            country: country.map(str::to_string),
            last_updated: Some(updated.to_string()),
        }
    };

    vec![
        list(
            "OFAC SDN List",
            "SANCTIONS",
            "US Office of Foreign Assets Control Specially Designated Nationals",
            Some("US"),
            "2024-03-01",
        ),
        list(
            "EU Sanctions List",
            "SANCTIONS",
            "European Union Consolidated Sanctions List",
            Some("EU"),
            "2024-02-28",
        ),
        list(
            "UN Sanctions List",
            "SANCTIONS",
            "United Nations Security Council Sanctions List",
            Some("UN"),
            "2024-02-25",
        ),
        list(
            "World-Check PEP Database",
            "PEP",
            "Politically Exposed Persons Database",
            None,
            "2024-03-05",
        ),
        list(
            "Adverse Media Database",
            "ADVERSE_MEDIA",
            "Global adverse media screening",
            None,
            "2024-03-06",
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_prefers_sample_company() {
        let response = company_search("gorman manufacturing");
        assert_eq!(
            response["MatchResponse"]["MatchCandidate"][0]["Organization"]["DUNSNumber"],
            SAMPLE_DUNS
        );
        let generic = company_search("Acme");
        assert_eq!(
            generic["MatchResponse"]["MatchCandidate"][0]["MatchGrade"],
            "B"
        );
    }

    #[test]
    fn test_person_fixture_selection() {
        let high = person_screening("Kim Jong Un", "R-1");
        assert_eq!(high["ScreeningResponse"]["Matches"].as_array().unwrap().len(), 2);
        assert_eq!(high["ScreeningResponse"]["ReferenceId"], "R-1");

        let clean = person_screening("Jane Doe", "R-2");
        assert!(clean["ScreeningResponse"]["Matches"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_entity_fixture_selection() {
        let hit = entity_screening("Bank of Somewhere", "E-1");
        assert_eq!(hit["ScreeningResponse"]["Matches"].as_array().unwrap().len(), 2);
    }
}
