use crate::domain::errors::{LinePayError, LinePayResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

macro_rules! currencies {
    ($($variant:ident => $code:literal,)+) => {
        /// 币种（ISO 4217）
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "&'static str")]
        pub enum Currency {
            $($variant,)+
        }

        impl Currency {
            /// 全部币种，按代码排序
            pub const ALL: &'static [Currency] = &[$(Currency::$variant,)+];

            pub fn code(&self) -> &'static str {
                match self {
                    $(Currency::$variant => $code,)+
                }
            }
        }

        impl FromStr for Currency {
            type Err = LinePayError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($code => Ok(Currency::$variant),)+
                    other => Err(LinePayError::validation(
                        "currency",
                        format!("unknown currency code `{}`", other),
                    )),
                }
            }
        }
    };
}

currencies! {
    Aed => "AED",
    Afn => "AFN",
    All => "ALL",
    Amd => "AMD",
    Ang => "ANG",
    Aoa => "AOA",
    Ars => "ARS",
    Aud => "AUD",
    Awg => "AWG",
    Azn => "AZN",
    Bam => "BAM",
    Bbd => "BBD",
    Bdt => "BDT",
    Bgn => "BGN",
    Bhd => "BHD",
    Bif => "BIF",
    Bmd => "BMD",
    Bnd => "BND",
    Bob => "BOB",
    Brl => "BRL",
    Bsd => "BSD",
    Btn => "BTN",
    Bwp => "BWP",
    Byn => "BYN",
    Bzd => "BZD",
    Cad => "CAD",
    Cdf => "CDF",
    Chf => "CHF",
    Clp => "CLP",
    Cny => "CNY",
    Cop => "COP",
    Crc => "CRC",
    Cup => "CUP",
    Cve => "CVE",
    Czk => "CZK",
    Djf => "DJF",
    Dkk => "DKK",
    Dop => "DOP",
    Dzd => "DZD",
    Egp => "EGP",
    Ern => "ERN",
    Etb => "ETB",
    Eur => "EUR",
    Fjd => "FJD",
    Fkp => "FKP",
    Gbp => "GBP",
    Gel => "GEL",
    Ghs => "GHS",
    Gip => "GIP",
    Gmd => "GMD",
    Gnf => "GNF",
    Gtq => "GTQ",
    Gyd => "GYD",
    Hkd => "HKD",
    Hnl => "HNL",
    Htg => "HTG",
    Huf => "HUF",
    Idr => "IDR",
    Ils => "ILS",
    Inr => "INR",
    Iqd => "IQD",
    Irr => "IRR",
    Isk => "ISK",
    Jmd => "JMD",
    Jod => "JOD",
    Jpy => "JPY",
    Kes => "KES",
    Kgs => "KGS",
    Khr => "KHR",
    Kmf => "KMF",
    Kpw => "KPW",
    Krw => "KRW",
    Kwd => "KWD",
    Kyd => "KYD",
    Kzt => "KZT",
    Lak => "LAK",
    Lbp => "LBP",
    Lkr => "LKR",
    Lrd => "LRD",
    Lsl => "LSL",
    Lyd => "LYD",
    Mad => "MAD",
    Mdl => "MDL",
    Mga => "MGA",
    Mkd => "MKD",
    Mmk => "MMK",
    Mnt => "MNT",
    Mop => "MOP",
    Mru => "MRU",
    Mur => "MUR",
    Mvr => "MVR",
    Mwk => "MWK",
    Mxn => "MXN",
    Myr => "MYR",
    Mzn => "MZN",
    Nad => "NAD",
    Ngn => "NGN",
    Nio => "NIO",
    Nok => "NOK",
    Npr => "NPR",
    Nzd => "NZD",
    Omr => "OMR",
    Pab => "PAB",
    Pen => "PEN",
    Pgk => "PGK",
    Php => "PHP",
    Pkr => "PKR",
    Pln => "PLN",
    Pyg => "PYG",
    Qar => "QAR",
    Ron => "RON",
    Rsd => "RSD",
    Rub => "RUB",
    Rwf => "RWF",
    Sar => "SAR",
    Sbd => "SBD",
    Scr => "SCR",
    Sdg => "SDG",
    Sek => "SEK",
    Sgd => "SGD",
    Shp => "SHP",
    Sle => "SLE",
    Sos => "SOS",
    Srd => "SRD",
    Ssp => "SSP",
    Stn => "STN",
    Svc => "SVC",
    Syp => "SYP",
    Szl => "SZL",
    Thb => "THB",
    Tjs => "TJS",
    Tmt => "TMT",
    Tnd => "TND",
    Top => "TOP",
    Try => "TRY",
    Ttd => "TTD",
    Twd => "TWD",
    Tzs => "TZS",
    Uah => "UAH",
    Ugx => "UGX",
    Usd => "USD",
    Uyu => "UYU",
    Uzs => "UZS",
    Ves => "VES",
    Vnd => "VND",
    Vuv => "VUV",
    Wst => "WST",
    Xaf => "XAF",
    Xcd => "XCD",
    Xof => "XOF",
    Xpf => "XPF",
    Yer => "YER",
    Zar => "ZAR",
    Zmw => "ZMW",
    Zwl => "ZWL",
}

impl TryFrom<String> for Currency {
    type Error = LinePayError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Currency> for &'static str {
    fn from(currency: Currency) -> Self {
        currency.code()
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// 支付类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PayType {
    /// 一次性支付
    Normal,
    /// 预授权支付（自动扣款）
    Preapproved,
}

/// 确认URL类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConfirmUrlType {
    /// 用户浏览器跳转到 confirmUrl
    Client,
    /// 服务端到服务端确认
    Server,
}

/// 接入环境
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Sandbox,
    Production,
}

impl Environment {
    /// 环境对应的API基础URL
    pub fn base_url(&self) -> &'static str {
        match self {
            Environment::Sandbox => "https://sandbox-api-pay.line.me",
            Environment::Production => "https://api-pay.line.me",
        }
    }
}

impl FromStr for Environment {
    type Err = LinePayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sandbox" => Ok(Environment::Sandbox),
            "production" => Ok(Environment::Production),
            other => Err(LinePayError::ConfigError(format!(
                "unknown environment `{}` (expected sandbox or production)",
                other
            ))),
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Environment::Sandbox => write!(f, "sandbox"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// 交易ID（19位数字）
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TransactionId(String);

impl TransactionId {
    pub const LENGTH: usize = 19;

    pub fn parse(value: &str) -> LinePayResult<Self> {
        if value.len() == Self::LENGTH && value.bytes().all(|b| b.is_ascii_digit()) {
            Ok(Self(value.to_string()))
        } else {
            Err(LinePayError::InvalidTransactionId(value.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for TransactionId {
    type Error = LinePayError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<TransactionId> for String {
    fn from(id: TransactionId) -> Self {
        id.0
    }
}

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
