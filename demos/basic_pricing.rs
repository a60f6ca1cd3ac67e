//! Example: Basic option pricing with Black-Scholes-Merton
//!
//! Run with: cargo run --example basic_pricing

use bsm_options::prelude::*;
use chrono::NaiveDate;

fn main() -> BsmResult<()> {
    // Option parameters
    let spot = 100.0;
    let strike = 105.0;
    let time = 0.25; // 3 months
    let rate = 0.05; // 5% risk-free rate
    let div = 0.02; // 2% dividend yield
    let vol = 0.20; // 20% volatility

    println!("=== Black-Scholes-Merton Pricing ===\n");
    println!("Spot:     ${:.2}", spot);
    println!("Strike:   ${:.2}", strike);
    println!("Time:     {:.2} years ({:.0} days)", time, time * DAYS_PER_YEAR);
    println!("Rate:     {:.1}%", rate * 100.0);
    println!("Div:      {:.1}%", div * 100.0);
    println!("Vol:      {:.1}%\n", vol * 100.0);

    let call = OptionParameters::call(spot, strike, time, rate, vol, div)?;
    let put = call.with_option_type(OptionType::Put);

    let call_price = bs_price(&call);
    let put_price = bs_price(&put);
    println!("Call Price: ${:.4}", call_price);
    println!("Put Price:  ${:.4}", put_price);

    // Verify put-call parity: C - P = S*e^(-qT) - K*e^(-rT)
    let parity_lhs = call_price - put_price;
    let parity_rhs = call.discounted_spot() - call.discounted_strike();
    println!("\nPut-Call Parity Check:");
    println!("  C - P = {:.4}", parity_lhs);
    println!("  S*e^(-qT) - K*e^(-rT) = {:.4}", parity_rhs);
    println!("  Difference: {:.6}", (parity_lhs - parity_rhs).abs());

    // Degenerate inputs fall back to the intrinsic limit
    println!("\n=== Degenerate Inputs ===\n");
    let zero_vol = call.with_volatility(0.0)?;
    let expiring = call.with_time_to_expiry(0.0)?.with_spot(110.0)?;
    println!("Zero vol call:      ${:.4}", bs_price(&zero_vol));
    println!("Expiring ITM call:  ${:.4}", bs_price(&expiring));

    // Small synthetic chain
    println!("\n=== Chain Comparison ===\n");
    let as_of = NaiveDate::from_ymd_opt(2025, 1, 2).unwrap_or_default();
    let records = vec![
        OptionRecord::new(95.0, "2025-04-03", 24.0, 7.9, 410),
        OptionRecord::new(100.0, "2025-04-03", 0.22, 4.6, 1200),
        OptionRecord::new(105.0, "2025-04-03", 21.0, 2.3, 860),
        OptionRecord::new(110.0, "2025-04-03", 0.005, 0.9, 35),
    ];
    let batch = price_all_on(&records, spot, rate, div, as_of)?;
    let summary = summarize_batch(&batch, 10);
    print!("{}", render_report("DEMO", &batch, &summary));

    Ok(())
}
