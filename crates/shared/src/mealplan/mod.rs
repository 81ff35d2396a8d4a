use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::{fmt, str::FromStr};
use strum::{AsRefStr, Display, EnumString, VariantArray};
use time::{Date, Duration, OffsetDateTime, Weekday, macros::format_description};

#[derive(
    EnumString,
    Display,
    VariantArray,
    AsRefStr,
    Serialize,
    Deserialize,
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
)]
pub enum Day {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Day {
    pub fn of(date: Date) -> Self {
        match date.weekday() {
            Weekday::Monday => Day::Monday,
            Weekday::Tuesday => Day::Tuesday,
            Weekday::Wednesday => Day::Wednesday,
            Weekday::Thursday => Day::Thursday,
            Weekday::Friday => Day::Friday,
            Weekday::Saturday => Day::Saturday,
            Weekday::Sunday => Day::Sunday,
        }
    }

    /// Days since Monday.
    pub fn offset(self) -> i64 {
        match self {
            Day::Monday => 0,
            Day::Tuesday => 1,
            Day::Wednesday => 2,
            Day::Thursday => 3,
            Day::Friday => 4,
            Day::Saturday => 5,
            Day::Sunday => 6,
        }
    }
}

#[derive(
    EnumString,
    Display,
    VariantArray,
    AsRefStr,
    Serialize,
    Deserialize,
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Slot {
    #[default]
    Breakfast,
    Lunch,
    Dinner,
}

impl Slot {
    pub fn title(self) -> &'static str {
        match self {
            Slot::Breakfast => "Breakfast",
            Slot::Lunch => "Lunch",
            Slot::Dinner => "Dinner",
        }
    }

    pub fn emoji(self) -> &'static str {
        match self {
            Slot::Breakfast => "🍳",
            Slot::Lunch => "🥪",
            Slot::Dinner => "🍝",
        }
    }
}

/// Monday that starts the week containing a reference date.
///
/// Rendered and persisted as `YYYY-MM-DD`. Parsing any date re-anchors it to
/// its Monday, so a key can never name another weekday.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WeekKey(Date);

impl WeekKey {
    pub fn of(date: Date) -> Self {
        Self(date - Duration::days(Day::of(date).offset()))
    }

    pub fn current() -> Self {
        Self::of(today())
    }

    pub fn start(&self) -> Date {
        self.0
    }

    pub fn end(&self) -> Date {
        self.date_of(Day::Sunday)
    }

    pub fn date_of(&self, day: Day) -> Date {
        self.0 + Duration::days(day.offset())
    }

    pub fn days(&self) -> impl Iterator<Item = (Day, Date)> + '_ {
        Day::VARIANTS.iter().map(move |day| (*day, self.date_of(*day)))
    }

    pub fn previous(&self) -> Self {
        Self(self.0 - Duration::weeks(1))
    }

    pub fn next(&self) -> Self {
        Self(self.0 + Duration::weeks(1))
    }

    /// `Jun 3 – Jun 9, 2024`
    pub fn range_label(&self) -> String {
        let end = self.end();

        format!(
            "{} – {}, {}",
            short_date(self.0),
            short_date(end),
            end.year()
        )
    }
}

impl fmt::Display for WeekKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&iso_date(self.0))
    }
}

impl FromStr for WeekKey {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_date(s).map(Self::of)
    }
}

impl Serialize for WeekKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for WeekKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        let date = parse_date(&value).map_err(serde::de::Error::custom)?;
        let week = Self::of(date);

        if week.start() != date {
            return Err(serde::de::Error::custom(format!(
                "week key is not a Monday: {value}"
            )));
        }

        Ok(week)
    }
}

/// Parses a `YYYY-MM-DD` date input.
pub fn parse_date(value: &str) -> crate::Result<Date> {
    let date = Date::parse(value.trim(), format_description!("[year]-[month]-[day]"))?;

    if !(1..=9998).contains(&date.year()) {
        crate::invalid!("date out of range: {value}");
    }

    Ok(date)
}

pub fn iso_date(date: Date) -> String {
    format!(
        "{:04}-{:02}-{:02}",
        date.year(),
        u8::from(date.month()),
        date.day()
    )
}

/// `Jun 4`
pub fn short_date(date: Date) -> String {
    let month = date.month().to_string();

    format!("{} {}", &month[..3], date.day())
}

pub fn today() -> Date {
    OffsetDateTime::now_local()
        .unwrap_or_else(|_| OffsetDateTime::now_utc())
        .date()
}
