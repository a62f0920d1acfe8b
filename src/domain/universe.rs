//! Screening universes: named index ticker tables and code-list parsing.
//!
//! Indian (NSE) symbols carry the `.NS` suffix the price provider expects;
//! US symbols are used as-is. Constituents are a point-in-time snapshot.

use crate::domain::error::ScreenerError;
use std::collections::HashSet;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Universe {
    pub name: String,
    pub codes: Vec<String>,
}

impl Universe {
    pub fn count(&self) -> usize {
        self.codes.len()
    }
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum UniverseError {
    #[error("empty token in code list")]
    EmptyToken,

    #[error("duplicate code: {0}")]
    DuplicateCode(String),
}

pub fn parse_codes(input: &str) -> Result<Vec<String>, UniverseError> {
    let mut codes = Vec::new();
    let mut seen = HashSet::new();

    for token in input.split(',') {
        let trimmed = token.trim();
        if trimmed.is_empty() {
            return Err(UniverseError::EmptyToken);
        }
        let code = trimmed.to_uppercase();
        if !seen.insert(code.clone()) {
            return Err(UniverseError::DuplicateCode(code));
        }
        codes.push(code);
    }

    Ok(codes)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Market {
    India,
    Us,
}

impl Market {
    fn suffix(self) -> &'static str {
        match self {
            Market::India => ".NS",
            Market::Us => "",
        }
    }
}

struct IndexDef {
    name: &'static str,
    market: Market,
    /// Unioned in order, first occurrence wins.
    parts: &'static [&'static [&'static str]],
}

const INDICES: &[IndexDef] = &[
    IndexDef { name: "nifty_50", market: Market::India, parts: &[NIFTY_50] },
    IndexDef { name: "nifty_next_50", market: Market::India, parts: &[NIFTY_NEXT_50] },
    IndexDef { name: "nifty_100", market: Market::India, parts: &[NIFTY_50, NIFTY_NEXT_50] },
    IndexDef { name: "nifty_it", market: Market::India, parts: &[NIFTY_IT] },
    IndexDef { name: "nifty_bank", market: Market::India, parts: &[NIFTY_BANK] },
    IndexDef { name: "nifty_pharma", market: Market::India, parts: &[NIFTY_PHARMA] },
    IndexDef { name: "nifty_auto", market: Market::India, parts: &[NIFTY_AUTO] },
    IndexDef { name: "nifty_fmcg", market: Market::India, parts: &[NIFTY_FMCG] },
    IndexDef { name: "nifty_metal", market: Market::India, parts: &[NIFTY_METAL] },
    IndexDef { name: "nifty_psu_bank", market: Market::India, parts: &[NIFTY_PSU_BANK] },
    IndexDef { name: "nifty_realty", market: Market::India, parts: &[NIFTY_REALTY] },
    IndexDef { name: "nifty_energy", market: Market::India, parts: &[NIFTY_ENERGY] },
    IndexDef { name: "nifty_infra", market: Market::India, parts: &[NIFTY_INFRA] },
    IndexDef { name: "nifty_midcap_50", market: Market::India, parts: &[NIFTY_MIDCAP_50] },
    IndexDef {
        name: "nifty_midcap_100",
        market: Market::India,
        parts: &[NIFTY_MIDCAP_50, NIFTY_MIDCAP_100_EXTRA],
    },
    IndexDef { name: "sp500_top50", market: Market::Us, parts: &[SP500_TOP50] },
    IndexDef { name: "nasdaq_100", market: Market::Us, parts: &[NASDAQ_100] },
    IndexDef { name: "dow_jones_30", market: Market::Us, parts: &[DOW_JONES_30] },
    IndexDef { name: "magnificent_7", market: Market::Us, parts: &[MAGNIFICENT_7] },
    IndexDef { name: "us_tech", market: Market::Us, parts: &[US_TECH] },
    IndexDef { name: "us_financials", market: Market::Us, parts: &[US_FINANCIALS] },
    IndexDef { name: "us_healthcare", market: Market::Us, parts: &[US_HEALTHCARE] },
];

/// All index names, sorted.
pub fn available_indices() -> Vec<&'static str> {
    let mut names: Vec<_> = INDICES.iter().map(|d| d.name).collect();
    names.sort_unstable();
    names
}

fn find_index(name: &str) -> Option<&'static IndexDef> {
    let key = name.trim().to_lowercase();
    INDICES.iter().find(|d| d.name == key)
}

/// Provider symbols for a named index. Case and surrounding whitespace in
/// `name` are ignored.
pub fn ticker_list(name: &str) -> Result<Vec<String>, ScreenerError> {
    let def = find_index(name).ok_or_else(|| ScreenerError::UnknownIndex {
        name: name.to_string(),
        available: available_indices().join(", "),
    })?;

    let mut seen = HashSet::new();
    let tickers = def
        .parts
        .iter()
        .flat_map(|part| part.iter())
        .filter(|code| seen.insert(**code))
        .map(|code| format!("{}{}", code, def.market.suffix()))
        .collect();

    Ok(tickers)
}

pub fn index_universe(name: &str) -> Result<Universe, ScreenerError> {
    Ok(Universe {
        name: name.trim().to_lowercase(),
        codes: ticker_list(name)?,
    })
}

const NIFTY_50: &[&str] = &[
    "RELIANCE", "TCS", "HDFCBANK", "INFY", "ICICIBANK", "HINDUNILVR", "ITC", "SBIN",
    "BHARTIARTL", "KOTAKBANK", "LT", "HCLTECH", "AXISBANK", "ASIANPAINT", "MARUTI", "SUNPHARMA",
    "TITAN", "BAJFINANCE", "DMART", "ULTRACEMCO", "NTPC", "ONGC", "NESTLEIND", "WIPRO", "M&M",
    "POWERGRID", "JSWSTEEL", "TATAMOTORS", "ADANIENT", "ADANIPORTS", "TATASTEEL", "COALINDIA",
    "HINDALCO", "TECHM", "BAJAJFINSV", "GRASIM", "DIVISLAB", "BRITANNIA", "CIPLA", "DRREDDY",
    "APOLLOHOSP", "EICHERMOT", "TATACONSUM", "SBILIFE", "BPCL", "HEROMOTOCO", "INDUSINDBK",
    "BAJAJ-AUTO", "HDFCLIFE", "UPL",
];

const NIFTY_NEXT_50: &[&str] = &[
    "ADANIENSOL", "ADANIGREEN", "ADANIPOWER", "ATGL", "AWL", "BANKBARODA", "BEL", "BERGEPAINT",
    "BOSCHLTD", "CANBK", "CHOLAFIN", "COLPAL", "DLF", "GAIL", "GODREJCP", "HAL", "HAVELLS",
    "ICICIGI", "ICICIPRULI", "INDHOTEL", "INDIGO", "IOC", "IRFC", "JINDALSTEL", "JSWENERGY",
    "LICI", "LODHA", "MARICO", "MAXHEALTH", "NHPC", "NYKAA", "OFSS", "PAYTM", "PFC",
    "PIDILITIND", "PNB", "POLYCAB", "RECLTD", "SAIL", "SHREECEM", "SHRIRAMFIN", "SIEMENS",
    "SRF", "TATAPOWER", "TORNTPHARM", "TRENT", "UNIONBANK", "VBL", "VEDL", "ZOMATO",
];

const NIFTY_IT: &[&str] = &[
    "TCS", "INFY", "HCLTECH", "WIPRO", "TECHM", "LTIM", "MPHASIS", "COFORGE", "PERSISTENT",
    "LTTS",
];

const NIFTY_BANK: &[&str] = &[
    "HDFCBANK", "ICICIBANK", "KOTAKBANK", "AXISBANK", "SBIN", "INDUSINDBK", "BANDHANBNK",
    "FEDERALBNK", "IDFCFIRSTB", "PNB", "BANKBARODA", "AUBANK",
];

const NIFTY_PHARMA: &[&str] = &[
    "SUNPHARMA", "DRREDDY", "CIPLA", "DIVISLAB", "APOLLOHOSP", "LUPIN", "AUROPHARMA", "BIOCON",
    "TORNTPHARM", "ALKEM", "ABBOTINDIA", "IPCALAB", "GLENMARK", "LAURUSLABS", "ZYDUSLIFE",
];

const NIFTY_AUTO: &[&str] = &[
    "TATAMOTORS", "M&M", "MARUTI", "BAJAJ-AUTO", "HEROMOTOCO", "EICHERMOT", "BHARATFORG",
    "BALKRISIND", "MOTHERSON", "TVSMOTOR", "ASHOKLEY", "BOSCHLTD", "MRF", "EXIDEIND",
    "AMARAJABAT",
];

const NIFTY_FMCG: &[&str] = &[
    "HINDUNILVR", "ITC", "NESTLEIND", "BRITANNIA", "TATACONSUM", "DABUR", "MARICO", "GODREJCP",
    "COLPAL", "PGHH", "EMAMILTD", "VBL", "UBL", "MCDOWELL-N", "RADICO",
];

const NIFTY_METAL: &[&str] = &[
    "TATASTEEL", "JSWSTEEL", "HINDALCO", "COALINDIA", "VEDL", "JINDALSTEL", "SAIL", "NMDC",
    "APLAPOLLO", "NATIONALUM", "MOIL", "RATNAMANI", "WELCORP", "HINDCOPPER", "JSWENERGY",
];

const NIFTY_PSU_BANK: &[&str] = &[
    "SBIN", "PNB", "BANKBARODA", "CANBK", "UNIONBANK", "INDIANB", "IOB", "CENTRALBK",
    "BANKINDIA", "MAHABANK", "UCOBANK", "PSB",
];

const NIFTY_REALTY: &[&str] = &[
    "DLF", "GODREJPROP", "OBEROIRLTY", "PHOENIXLTD", "PRESTIGE", "BRIGADE", "SOBHA", "SUNTECK",
    "LODHA", "MAHLIFE",
];

const NIFTY_ENERGY: &[&str] = &[
    "RELIANCE", "ONGC", "NTPC", "POWERGRID", "BPCL", "IOC", "GAIL", "ADANIGREEN", "TATAPOWER",
    "ADANIENSOL",
];

const NIFTY_INFRA: &[&str] = &[
    "LT", "ADANIPORTS", "POWERGRID", "NTPC", "ULTRACEMCO", "GRASIM", "BHARTIARTL", "DLF",
    "SIEMENS", "ABB",
];

const NIFTY_MIDCAP_50: &[&str] = &[
    "MUTHOOTFIN", "PAGEIND", "VOLTAS", "INDIGO", "PIIND", "MFSL", "IDFCFIRSTB", "FEDERALBNK",
    "ASTRAL", "POLYCAB", "TRENT", "JUBLFOOD", "LALPATHLAB", "CUMMINSIND", "PERSISTENT",
    "COFORGE", "CROMPTON", "ESCORTS", "OBEROIRLTY", "GODREJPROP", "MRF", "SYNGENE", "INDIANB",
    "AUROPHARMA", "ACC", "AMBUJACEM", "ATUL", "BATAINDIA", "CANBK", "CONCOR", "DEEPAKNTR",
    "DIXON", "GLAND", "GMRINFRA", "GNFC", "GSPL", "HAL", "HINDPETRO", "ICICIGI", "IDEA",
    "IRCTC", "IRFC", "LICHSGFIN", "LTTS", "LUPIN", "MANAPPURAM", "MAXHEALTH", "METROPOLIS",
    "NAM-INDIA", "NATIONALUM",
];

const NIFTY_MIDCAP_100_EXTRA: &[&str] = &[
    "AARTIIND", "ABCAPITAL", "AJANTPHARM", "ALKYLAMINE", "ANGELONE", "APLAPOLLO", "BALRAMCHIN",
    "BHARATFORG", "BHEL", "BSE", "CANFINHOME", "CARBORUNIV", "CDSL", "CENTRALBK", "CLEAN",
    "COCHINSHIP", "CUB", "CUMMINSIND", "CYIENT", "DALBHARAT", "EMAMILTD", "ENDURANCE", "FACT",
    "FINCABLES", "FLUOROCHEM", "FORTIS", "FSL", "GESHIP", "GLAXO", "GLENMARK", "GUJGASLTD",
    "HEG", "HONAUT", "IPCALAB", "IRCTC", "ISEC", "IEX", "JKCEMENT", "JMFINANCIL", "JSL",
    "JUBLINGREA", "KAJARIACER", "KALYANKJIL", "KEI", "KEC",
];

const SP500_TOP50: &[&str] = &[
    "AAPL", "MSFT", "GOOGL", "AMZN", "NVDA", "META", "TSLA", "BRK-B", "UNH", "JNJ", "V", "XOM",
    "JPM", "PG", "MA", "HD", "CVX", "MRK", "ABBV", "LLY", "PEP", "COST", "KO", "AVGO", "WMT",
    "MCD", "CSCO", "TMO", "ACN", "ABT", "DHR", "VZ", "ADBE", "CRM", "NKE", "CMCSA", "NEE",
    "TXN", "PM", "UPS", "RTX", "INTC", "ORCL", "AMD", "HON", "IBM", "QCOM", "LOW", "SPGI",
    "CAT",
];

const NASDAQ_100: &[&str] = &[
    "AAPL", "MSFT", "GOOGL", "GOOG", "AMZN", "NVDA", "META", "TSLA", "AVGO", "COST", "ASML",
    "PEP", "CSCO", "AZN", "ADBE", "NFLX", "AMD", "TMUS", "TXN", "CMCSA", "INTC", "QCOM", "HON",
    "AMGN", "INTU", "AMAT", "ISRG", "BKNG", "SBUX", "VRTX", "MDLZ", "GILD", "ADI", "ADP",
    "LRCX", "REGN", "MU", "PANW", "PYPL", "SNPS", "KLAC", "CDNS", "MELI", "CSX", "ORLY", "MAR",
    "MRVL", "NXPI", "MNST", "FTNT", "CTAS", "PCAR", "WDAY", "ADSK", "CHTR", "DXCM", "KDP",
    "AEP", "MRNA", "KHC", "PAYX", "CPRT", "MCHP", "ODFL", "EXC", "ROST", "LULU", "IDXX", "FAST",
    "GEHC", "EA", "VRSK", "CTSH", "BKR", "CSGP", "FANG", "XEL", "ON", "DDOG", "ANSS", "ZS",
    "CDW", "GFS", "TTWO", "ILMN", "WBD", "BIIB", "DLTR", "WBA", "ALGN", "ENPH", "SIRI", "JD",
    "LCID", "ZM",
];

const DOW_JONES_30: &[&str] = &[
    "AAPL", "AMGN", "AXP", "BA", "CAT", "CRM", "CSCO", "CVX", "DIS", "DOW", "GS", "HD", "HON",
    "IBM", "INTC", "JNJ", "JPM", "KO", "MCD", "MMM", "MRK", "MSFT", "NKE", "PG", "TRV", "UNH",
    "V", "VZ", "WBA", "WMT",
];

const MAGNIFICENT_7: &[&str] = &[
    "AAPL", "MSFT", "GOOGL", "AMZN", "NVDA", "META", "TSLA",
];

const US_TECH: &[&str] = &[
    "AAPL", "MSFT", "GOOGL", "AMZN", "NVDA", "META", "TSLA", "AVGO", "ADBE", "CRM", "AMD",
    "INTC", "QCOM", "TXN", "AMAT", "LRCX", "MU", "SNPS", "CDNS", "KLAC", "NFLX", "PYPL", "NOW",
    "PANW", "INTU", "ORCL", "IBM", "CSCO", "DELL", "HPQ",
];

const US_FINANCIALS: &[&str] = &[
    "JPM", "BAC", "WFC", "GS", "MS", "C", "BLK", "SCHW", "AXP", "SPGI", "CB", "PNC", "USB",
    "TFC", "COF", "BK", "AIG", "MET", "PRU", "ALL",
];

const US_HEALTHCARE: &[&str] = &[
    "UNH", "JNJ", "LLY", "PFE", "ABBV", "MRK", "TMO", "ABT", "DHR", "BMY", "AMGN", "GILD",
    "VRTX", "REGN", "ISRG", "MDT", "SYK", "ZTS", "BDX", "CI",
];
