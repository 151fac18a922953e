//! Savings account catalog: built-in demo data and CSV loading

use super::SavingsAccount;
use crate::error::Result;
use log::info;
use std::path::Path;

#[allow(clippy::too_many_arguments)]
fn account(
    id: &str,
    bank: &str,
    product: &str,
    apy: f64,
    min_deposit: f64,
    monthly_fee: f64,
    instant_transfers: bool,
    notes: &str,
    url: &str,
) -> SavingsAccount {
    SavingsAccount {
        id: id.to_string(),
        bank: bank.to_string(),
        product: product.to_string(),
        apy,
        min_deposit,
        monthly_fee,
        instant_transfers,
        notes: notes.to_string(),
        url: url.to_string(),
    }
}

/// Built-in comparison set (rates are illustrative, not live)
pub fn default_accounts() -> Vec<SavingsAccount> {
    vec![
        account("axos-one", "Axos Bank", "ONE Savings", 0.0451, 0.0, 0.0, true, "Top APY with no monthly fee and no minimum.", "https://www.axosbank.com/"),
        account("sofi-savings", "SoFi", "Savings", 0.045, 0.0, 0.0, true, "High APY and simple app experience.", "https://www.sofi.com/"),
        account("wealthfront-cash", "Wealthfront", "Cash Account", 0.04, 0.0, 0.0, true, "Great UX, no minimum deposit.", "https://www.wealthfront.com/"),
        account("lendingclub-hysa", "LendingClub", "High Yield Savings", 0.042, 100.0, 0.0, true, "Good rate with a small minimum deposit.", "https://www.lendingclub.com/"),
        account("ally-online", "Ally", "Online Savings", 0.0435, 0.0, 0.0, true, "Trusted all-rounder with buckets and tools.", "https://www.ally.com/"),
        account("salliemae-hysa", "Sallie Mae", "High Yield Savings", 0.039, 0.0, 0.0, true, "Solid APY and easy account opening.", "https://www.salliemae.com/"),
        account("discover-online", "Discover", "Online Savings", 0.0385, 0.0, 0.0, true, "Strong service and no fees.", "https://www.discover.com/online-banking/savings/"),
        account("synchrony-hysa", "Synchrony", "High Yield Savings", 0.038, 0.0, 0.0, true, "Decent rate with simple setup.", "https://www.synchronybank.com/banking/high-yield-savings/"),
        account("pnc-hysa", "PNC Bank", "High Yield Savings", 0.0395, 0.0, 0.0, false, "Traditional bank option; fewer perks.", "https://www.pnc.com/"),
        account("usbank-smartly", "U.S. Bank", "Smartly Savings", 0.004, 100.0, 10.0, false, "Low APY and possible monthly fee.", "https://www.usbank.com/"),
        account("chime-savings", "Chime", "Savings", 0.0125, 0.0, 0.0, true, "Very low APY compared to top HYSAs.", "https://www.chime.com/"),
        account("boa-regular", "Bank of America", "Regular Savings", 0.0001, 100.0, 8.0, false, "Low APY and monthly fee; what to avoid.", "https://www.bankofamerica.com/"),
    ]
}

/// Load accounts from a CSV file with a header matching the field names
pub fn load_accounts<P: AsRef<Path>>(path: P) -> Result<Vec<SavingsAccount>> {
    let path = path.as_ref();
    let accounts = load_accounts_from_reader(std::fs::File::open(path)?)?;
    info!("Loaded {} savings accounts from {}", accounts.len(), path.display());
    Ok(accounts)
}

pub fn load_accounts_from_reader<R: std::io::Read>(reader: R) -> Result<Vec<SavingsAccount>> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut accounts = Vec::new();
    for result in csv_reader.deserialize() {
        accounts.push(result?);
    }
    Ok(accounts)
}
