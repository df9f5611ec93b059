use crate::domain::model::MealRecord;
use crate::utils::error::{MealError, Result};
use roxmltree::{Document, Node, ParsingOptions};

const ROW_TAG: &str = "row";
const PARSER_ERROR_TAG: &str = "parsererror";
const DEFAULT_MEAL_NAME: &str = "급식";

const MEAL_NAME_TAG: &str = "MMEAL_SC_NM";
const DISHES_TAG: &str = "DDISH_NM";
const CALORIES_TAG: &str = "CAL_INFO";
const NUTRITION_TAG: &str = "NTR_INFO";
const ORIGIN_TAG: &str = "ORPLC_INFO";

/// 把 API 回應解析成餐點清單。
///
/// 回傳 `Ok(None)` 代表文件正常但沒有任何 `row`，也就是當天沒有供餐，
/// 這和解析失敗是兩回事。輸出順序與文件中的 `row` 順序一致。
pub fn parse_response(xml_text: &str) -> Result<Option<Vec<MealRecord>>> {
    // 有些閘道會在回應前面加上 DOCTYPE
    let options = ParsingOptions {
        allow_dtd: true,
        ..ParsingOptions::default()
    };
    let doc = Document::parse_with_options(xml_text, options).map_err(|e| {
        MealError::XmlParseError {
            message: e.to_string(),
        }
    })?;

    // 瀏覽器的 DOMParser 會把錯誤包成 <parsererror>，中繼伺服器有時原樣轉送
    if doc.descendants().any(|n| has_tag(&n, PARSER_ERROR_TAG)) {
        return Err(MealError::XmlParseError {
            message: "response contains a parsererror element".to_string(),
        });
    }

    let rows: Vec<Node> = doc.descendants().filter(|n| has_tag(n, ROW_TAG)).collect();
    if rows.is_empty() {
        tracing::debug!("No <row> elements in response");
        return Ok(None);
    }

    let records = rows
        .iter()
        .map(|row| {
            let meal_name = element_value(row, MEAL_NAME_TAG);
            MealRecord {
                meal_name: if meal_name.is_empty() {
                    DEFAULT_MEAL_NAME.to_string()
                } else {
                    meal_name
                },
                dishes: element_value(row, DISHES_TAG),
                calories: element_value(row, CALORIES_TAG),
                nutrition: element_value(row, NUTRITION_TAG),
                origin: element_value(row, ORIGIN_TAG),
            }
        })
        .collect::<Vec<_>>();

    tracing::debug!("Parsed {} meal rows", records.len());
    Ok(Some(records))
}

fn has_tag(node: &Node, tag: &str) -> bool {
    node.is_element() && node.tag_name().name() == tag
}

/// 第一個符合標籤的子孫節點的全部文字，找不到時回傳空字串
fn element_value(parent: &Node, tag: &str) -> String {
    parent
        .descendants()
        .skip(1)
        .find(|n| has_tag(n, tag))
        .map(|element| {
            element
                .descendants()
                .filter(|n| n.is_text())
                .filter_map(|n| n.text())
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    const TWO_MEALS: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<mealServiceDietInfo>
  <head>
    <list_total_count>2</list_total_count>
    <RESULT><CODE>INFO-000</CODE><MESSAGE>정상 처리되었습니다.</MESSAGE></RESULT>
  </head>
  <row>
    <ATPT_OFCDC_SC_CODE>J10</ATPT_OFCDC_SC_CODE>
    <MMEAL_SC_NM>중식</MMEAL_SC_NM>
    <DDISH_NM><![CDATA[백미밥<br/>김치(돈육)<br/>된장국]]></DDISH_NM>
    <CAL_INFO>650.2 Kcal</CAL_INFO>
    <NTR_INFO>탄수화물(g) : 95.2</NTR_INFO>
    <ORPLC_INFO>쌀 : 국내산</ORPLC_INFO>
  </row>
  <row>
    <MMEAL_SC_NM>석식</MMEAL_SC_NM>
    <DDISH_NM>카레라이스&lt;br/&gt;우유</DDISH_NM>
    <CAL_INFO>710.0 Kcal</CAL_INFO>
  </row>
</mealServiceDietInfo>"#;

    #[test]
    fn test_parse_rows_in_document_order() {
        let records = parse_response(TWO_MEALS).unwrap().unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].meal_name, "중식");
        assert_eq!(records[0].dishes, "백미밥<br/>김치(돈육)<br/>된장국");
        assert_eq!(records[0].calories, "650.2 Kcal");
        assert_eq!(records[0].nutrition, "탄수화물(g) : 95.2");
        assert_eq!(records[0].origin, "쌀 : 국내산");
        assert_eq!(records[1].meal_name, "석식");
        assert_eq!(records[1].dishes, "카레라이스<br/>우유");
    }

    #[test]
    fn test_missing_fields_default_to_empty() {
        let xml = "<root><row><MMEAL_SC_NM>중식</MMEAL_SC_NM></row></root>";
        let records = parse_response(xml).unwrap().unwrap();

        assert_eq!(
            records[0],
            MealRecord {
                meal_name: "중식".to_string(),
                dishes: String::new(),
                calories: String::new(),
                nutrition: String::new(),
                origin: String::new(),
            }
        );
    }

    #[test]
    fn test_missing_or_blank_meal_name_uses_default_label() {
        let xml = "<root><row><CAL_INFO>1 Kcal</CAL_INFO></row><row><MMEAL_SC_NM/></row></root>";
        let records = parse_response(xml).unwrap().unwrap();

        assert_eq!(records[0].meal_name, "급식");
        assert_eq!(records[1].meal_name, "급식");
    }

    #[test]
    fn test_no_rows_returns_none() {
        let xml = r#"<RESULT><CODE>INFO-200</CODE><MESSAGE>해당하는 데이터가 없습니다.</MESSAGE></RESULT>"#;
        assert_eq!(parse_response(xml).unwrap(), None);
    }

    #[test]
    fn test_malformed_xml_is_parse_error() {
        let result = parse_response("<mealServiceDietInfo><row><MMEAL_SC_NM>중식</row>");
        assert!(matches!(result, Err(MealError::XmlParseError { .. })));

        let result = parse_response("<html>Bad Gateway");
        assert!(matches!(result, Err(MealError::XmlParseError { .. })));
    }

    #[test]
    fn test_parsererror_marker_is_parse_error() {
        let xml = "<root><parsererror>error on line 1</parsererror><row/></root>";
        assert!(matches!(
            parse_response(xml),
            Err(MealError::XmlParseError { .. })
        ));
    }

    #[test]
    fn test_field_text_includes_nested_elements() {
        let xml = "<root><row><DDISH_NM>밥<b>국</b></DDISH_NM></row></root>";
        let records = parse_response(xml).unwrap().unwrap();
        assert_eq!(records[0].dishes, "밥국");
    }

    #[test]
    fn test_doctype_is_accepted() {
        let xml = concat!(
            "<?xml version=\"1.0\"?><!DOCTYPE mealServiceDietInfo>",
            "<mealServiceDietInfo><row><MMEAL_SC_NM>중식</MMEAL_SC_NM></row></mealServiceDietInfo>"
        );
        let records = parse_response(xml).unwrap().unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].meal_name, "중식");
        assert_eq!(records[0].dishes, "");
    }
}
