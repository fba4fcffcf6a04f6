//! Reply Composer
//!
//! Maps the shape of an upstream result to exactly one outbound message:
//! a forecast becomes a card, everything else becomes text.

use crate::domain::entities::{
    FlexBox, FlexBubble, FlexComponent, FlexSeparator, FlexText, ForecastPeriod, ReplyMessage,
    WeatherForecast,
};

/// Asked for the weather without naming a city we know
pub const CITY_UNRESOLVED_REPLY: &str = "請告訴我想查詢的城市，例如：台北天氣";

/// How many forecast windows the card shows
const MAX_CARD_PERIODS: usize = 3;

const HEADER_COLOR: &str = "#1DB446";
const LABEL_COLOR: &str = "#8C8C8C";

/// Upstream result a reply is composed from
#[derive(Debug, Clone, Copy)]
pub enum ReplySource<'a> {
    /// Successful weather lookup
    Forecast(&'a WeatherForecast),
    /// Weather lookup for `city` failed
    WeatherUnavailable { city: &'a str },
    /// Weather inquiry without a resolvable city
    CityUnresolved,
    /// Text produced by the strategy dispatcher
    Text(&'a str),
}

/// Build the reply message for an upstream result
pub fn compose(source: ReplySource<'_>) -> ReplyMessage {
    match source {
        ReplySource::Forecast(forecast) if !forecast.is_empty() => weather_card(forecast),
        ReplySource::Forecast(forecast) => ReplyMessage::text(unavailable_text(&forecast.city)),
        ReplySource::WeatherUnavailable { city } => ReplyMessage::text(unavailable_text(city)),
        ReplySource::CityUnresolved => ReplyMessage::text(CITY_UNRESOLVED_REPLY),
        ReplySource::Text(text) => ReplyMessage::text(text),
    }
}

/// Fallback text when a lookup fails
pub fn unavailable_text(city: &str) -> String {
    format!("目前無法取得{}的天氣資訊，請稍後再試。", city)
}

/// Flex card summarizing the first few forecast windows
pub fn weather_card(forecast: &WeatherForecast) -> ReplyMessage {
    let title = format!("{} 天氣預報", forecast.city);

    let header = FlexBox::vertical().push_text(
        FlexText::new(title.clone())
            .bold()
            .size("xl")
            .color(HEADER_COLOR),
    );

    let mut body = FlexBox::vertical().spacing("md");
    for (idx, period) in forecast.periods.iter().take(MAX_CARD_PERIODS).enumerate() {
        if idx > 0 {
            body = body.push(FlexComponent::Separator(FlexSeparator {
                margin: Some("md".to_string()),
            }));
        }
        body = body.push(FlexComponent::Box(period_section(period)));
    }

    let alt_text = match forecast.periods.first() {
        Some(first) => format!("{}：{}", title, first.description),
        None => title.clone(),
    };

    ReplyMessage::flex(alt_text, FlexBubble::default().with_header(header).with_body(body))
}

fn period_section(period: &ForecastPeriod) -> FlexBox {
    let mut section = FlexBox::vertical()
        .spacing("sm")
        .push_text(FlexText::new(period.time_label()).size("sm").color(LABEL_COLOR))
        .push_text(FlexText::new(non_empty(&period.description, "—")).bold().wrap());

    if let Some(range) = period.temperature_range() {
        section = section.push(labelled_row("溫度", &range));
    }
    if let Some(pop) = period.rain_probability {
        section = section.push(labelled_row("降雨機率", &format!("{}%", pop)));
    }
    if let Some(comfort) = period.comfort.as_deref().filter(|c| !c.trim().is_empty()) {
        section = section.push(labelled_row("舒適度", comfort));
    }
    section
}

fn labelled_row(label: &str, value: &str) -> FlexComponent {
    FlexComponent::Box(
        FlexBox::horizontal()
            .push_text(FlexText::new(label).size("sm").color(LABEL_COLOR).flex(2))
            .push_text(FlexText::new(value).size("sm").wrap().flex(5)),
    )
}

fn non_empty<'a>(value: &'a str, placeholder: &'a str) -> &'a str {
    if value.trim().is_empty() {
        placeholder
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_forecast() -> WeatherForecast {
        let mut first = ForecastPeriod::new("2024-06-01 06:00:00", "2024-06-01 18:00:00", "多雲時晴");
        first.rain_probability = Some(20);
        first.min_temperature = Some(26);
        first.max_temperature = Some(33);
        first.comfort = Some("悶熱".to_string());

        let mut second = ForecastPeriod::new("2024-06-01 18:00:00", "2024-06-02 06:00:00", "");
        second.rain_probability = Some(0);

        WeatherForecast::new("臺北市", vec![first, second])
    }

    #[test]
    fn test_forecast_becomes_card() {
        let message = compose(ReplySource::Forecast(&sample_forecast()));
        assert_eq!(message.kind(), "flex");
    }

    #[test]
    fn test_card_text_fields_are_non_empty() {
        let message = compose(ReplySource::Forecast(&sample_forecast()));
        let json = serde_json::to_value(&message).unwrap();
        let decoded: ReplyMessage = serde_json::from_value(json).unwrap();

        let texts = decoded.texts();
        assert!(texts.len() > 3);
        assert!(texts.iter().all(|t| !t.trim().is_empty()));
        assert!(texts.contains(&"臺北市 天氣預報"));
        assert!(texts.contains(&"26°C ~ 33°C"));
        assert!(texts.contains(&"20%"));
    }

    fn assert_flex_node(node: &serde_json::Value) {
        match node["type"].as_str() {
            Some("box") => {
                assert!(node["layout"].is_string());
                let contents = node["contents"].as_array().unwrap();
                contents.iter().for_each(assert_flex_node);
            }
            Some("text") => {
                assert!(!node["text"].as_str().unwrap().trim().is_empty());
            }
            Some("separator") => {}
            other => panic!("Unexpected flex node type: {:?}", other),
        }
    }

    #[test]
    fn test_card_matches_flex_schema() {
        let message = compose(ReplySource::Forecast(&sample_forecast()));
        let json = serde_json::to_value(&message).unwrap();

        assert_eq!(json["type"], "flex");
        assert!(!json["altText"].as_str().unwrap().is_empty());
        assert_eq!(json["contents"]["type"], "bubble");
        assert_eq!(json["contents"]["header"]["type"], "box");
        assert_eq!(json["contents"]["body"]["type"], "box");
        assert_flex_node(&json["contents"]["header"]);
        assert_flex_node(&json["contents"]["body"]);
    }

    #[test]
    fn test_card_limits_periods() {
        let periods = (0..5)
            .map(|i| ForecastPeriod::new(format!("s{i}"), format!("e{i}"), format!("d{i}")))
            .collect();
        let message = weather_card(&WeatherForecast::new("高雄市", periods));
        let texts = message.texts();
        assert!(texts.contains(&"d2"));
        assert!(!texts.contains(&"d3"));
    }

    #[test]
    fn test_empty_forecast_is_unavailable_text() {
        let forecast = WeatherForecast::new("臺中市", vec![]);
        assert_eq!(
            compose(ReplySource::Forecast(&forecast)),
            ReplyMessage::text(unavailable_text("臺中市"))
        );
    }

    #[test]
    fn test_text_sources() {
        assert_eq!(
            compose(ReplySource::CityUnresolved),
            ReplyMessage::text(CITY_UNRESOLVED_REPLY)
        );
        assert_eq!(
            compose(ReplySource::WeatherUnavailable { city: "臺北市" }),
            ReplyMessage::text("目前無法取得臺北市的天氣資訊，請稍後再試。")
        );
        assert_eq!(compose(ReplySource::Text("回應你的內容")), ReplyMessage::text("回應你的內容"));
    }
}
