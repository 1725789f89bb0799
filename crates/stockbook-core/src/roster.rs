//! The fixed list of tracked NSE equities and history defaults.
//!
//! Exposed as functions rather than module-level state so each stage takes
//! the roster and date range as explicit parameters.

use time::{Date, Month};

use crate::{StockListing, Ticker};

/// (Yahoo Finance ticker, company name) pairs tracked by default.
const NSE_ROSTER: [(&str, &str); 20] = [
    ("RELIANCE.NS", "Reliance Industries Ltd."),
    ("TCS.NS", "Tata Consultancy Services Ltd."),
    ("HDFCBANK.NS", "HDFC Bank Ltd."),
    ("ICICIBANK.NS", "ICICI Bank Ltd."),
    ("BHARTIARTL.NS", "Bharti Airtel Ltd."),
    ("SBIN.NS", "State Bank of India"),
    ("INFY.NS", "Infosys Ltd."),
    ("HINDUNILVR.NS", "Hindustan Unilever Ltd."),
    ("LT.NS", "Larsen & Toubro Ltd."),
    ("BAJFINANCE.NS", "Bajaj Finance Ltd."),
    ("ITC.NS", "ITC Ltd."),
    ("HCLTECH.NS", "HCL Technologies Ltd."),
    ("MARUTI.NS", "Maruti Suzuki India Ltd."),
    ("SUNPHARMA.NS", "Sun Pharmaceutical Industries Ltd."),
    ("KOTAKBANK.NS", "Kotak Mahindra Bank Ltd."),
    ("M&M.NS", "Mahindra & Mahindra Ltd."),
    ("AXISBANK.NS", "Axis Bank Ltd."),
    ("ULTRACEMCO.NS", "UltraTech Cement Ltd."),
    ("BAJAJFINSV.NS", "Bajaj Finserv Ltd."),
    ("NTPC.NS", "NTPC Ltd."),
];

/// The default tracked-stock roster.
pub fn default_roster() -> Vec<StockListing> {
    NSE_ROSTER
        .iter()
        .map(|(ticker, name)| {
            let ticker = Ticker::parse(ticker).expect("roster ticker is valid");
            StockListing::new(ticker, *name)
        })
        .collect()
}

/// Default first day of fetched history.
pub fn default_start_date() -> Date {
    Date::from_calendar_date(2010, Month::January, 1).expect("default start date is valid")
}
