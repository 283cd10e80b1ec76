use serde::Serialize;

/// SplitMix64: small, seedable and good enough for sample data.
struct SampleRng(u64);

impl SampleRng {
    fn next_u64(&mut self) -> u64 {
        self.0 = self.0.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.0;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }

    /// Uniform in `[0, 1)` from the top 53 bits.
    fn unit(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 * (1.0 / (1u64 << 53) as f64)
    }

    fn uniform(&mut self, lo: f64, hi: f64) -> f64 {
        lo + (hi - lo) * self.unit()
    }

    /// Normal sample (Marsaglia polar method).
    fn normal(&mut self, mean: f64, std_dev: f64) -> f64 {
        loop {
            let u = self.uniform(-1.0, 1.0);
            let v = self.uniform(-1.0, 1.0);
            let s = u * u + v * v;
            if s > 0.0 && s < 1.0 {
                return mean + std_dev * u * (-2.0 * s.ln() / s).sqrt();
            }
        }
    }
}

#[derive(Serialize)]
struct RateRow<'a> {
    mes: &'a str,
    razon_social: &'a str,
    #[serde(rename = "ULTIMA_CALIFICACIÓN")]
    calificacion: &'a str,
    plazo: u32,
    tasa_pasiva_efectiva: f64,
}

/// Company rows are written with decimal commas, so numbers go out as text.
#[derive(Serialize)]
struct CompanyRow<'a> {
    #[serde(rename = "Empresa")]
    empresa: &'a str,
    #[serde(rename = "Año")]
    anio: i32,
    #[serde(rename = "Ingresos")]
    ingresos: String,
    #[serde(rename = "Utilidad Neta")]
    utilidad_neta: String,
    #[serde(rename = "Margen Bruto %")]
    margen_bruto: String,
    #[serde(rename = "Margen Neto %")]
    margen_neto: String,
    #[serde(rename = "Costo de Ventas")]
    costo_ventas: String,
    #[serde(rename = "Crecimiento de Anual de Ingresos %")]
    crecimiento_ingresos: String,
    #[serde(rename = "Crecimiento de Costos %")]
    crecimiento_costos: String,
    #[serde(rename = "Precio Acción")]
    precio_accion: String,
}

fn comma(v: f64) -> String {
    format!("{v:.2}").replace('.', ",")
}

fn write_rates(rng: &mut SampleRng, path: &str) -> csv::Result<usize> {
    // (entity, rating, base rate)
    let entities = [
        ("Banco Pichincha", "AAA", 5.4),
        ("Banco Guayaquil", "AAA", 5.6),
        ("Banco del Pacífico", "AAA-", 5.8),
        ("Produbanco", "AAA-", 5.5),
        ("Banco Bolivariano", "AAA-", 5.9),
        ("Banco Internacional", "AAA-", 6.0),
        ("Cooperativa JEP", "AA+", 7.2),
        ("Cooperativa Jardín Azuayo", "AA", 7.4),
        ("Cooperativa Policía Nacional", "AA-", 7.9),
        ("Banco Solidario", "A+", 7.0),
        ("Cooperativa Alianza del Valle", "A", 8.1),
        ("Mutualista Pichincha", "A-", 6.8),
        ("Cooperativa San Francisco", "BBB+", 8.6),
        ("Banco Amazonas", "BB", 8.9),
        ("Cooperativa Andalucía", "SC", 8.3),
    ];
    let terms = [30u32, 60, 90, 180, 361];
    let months = ["2025-07", "2025-08", "2025-09"];

    let mut writer = csv::Writer::from_path(path)?;
    let mut rows = 0;
    for (m, month) in months.iter().enumerate() {
        for &(name, rating, base) in &entities {
            for (t, &term) in terms.iter().enumerate() {
                // Not every entity quotes every term.
                if rng.unit() < 0.15 {
                    continue;
                }
                let rate = base + 0.45 * t as f64 - 0.1 * m as f64 + rng.normal(0.0, 0.25);
                writer.serialize(RateRow {
                    mes: month,
                    razon_social: name,
                    calificacion: rating,
                    plazo: term,
                    tasa_pasiva_efectiva: (rate.max(0.5) * 1000.0).round() / 1000.0,
                })?;
                rows += 1;
            }
        }
    }
    writer.flush()?;
    Ok(rows)
}

fn write_companies(rng: &mut SampleRng, path: &str) -> csv::Result<usize> {
    // (company, revenue 2019, gross margin, net margin, share price 2019)
    let companies = [
        ("Holcim Ecuador", 420.0, 38.0, 14.0, 62.0),
        ("Corporación Favorita", 2050.0, 27.0, 5.5, 2.9),
        ("Cervecería Nacional", 510.0, 52.0, 18.0, 48.0),
    ];

    let mut writer = csv::WriterBuilder::new()
        .delimiter(b';')
        .from_path(path)?;
    let mut rows = 0;
    for &(name, revenue0, gross0, net0, price0) in &companies {
        let mut revenue: f64 = revenue0;
        let mut cost = revenue * (1.0 - gross0 / 100.0);
        let mut price: f64 = price0;
        for year in 2019..=2024 {
            let growth = rng.uniform(-6.0, 11.0);
            let new_revenue = revenue * (1.0 + growth / 100.0);
            let gross = (gross0 + rng.normal(0.0, 1.5)).clamp(5.0, 80.0);
            let new_cost = new_revenue * (1.0 - gross / 100.0);
            let net = (net0 + rng.normal(0.0, 1.0)).max(-5.0);
            price *= 1.0 + rng.uniform(-0.15, 0.2);

            let first = year == 2019;
            writer.serialize(CompanyRow {
                empresa: name,
                anio: year,
                ingresos: comma(new_revenue),
                utilidad_neta: comma(new_revenue * net / 100.0),
                margen_bruto: comma(gross),
                margen_neto: comma(net),
                costo_ventas: comma(new_cost),
                crecimiento_ingresos: if first { String::new() } else { comma(growth) },
                crecimiento_costos: if first {
                    String::new()
                } else {
                    comma((new_cost / cost - 1.0) * 100.0)
                },
                precio_accion: comma(price),
            })?;
            revenue = new_revenue;
            cost = new_cost;
            rows += 1;
        }
    }
    writer.flush()?;
    Ok(rows)
}

fn main() {
    let mut rng = SampleRng(42);

    let rates_path = "tasas_sample.csv";
    let n = write_rates(&mut rng, rates_path).expect("Failed to write rate sample");
    println!("Wrote {n} rate offers to {rates_path}");

    let companies_path = "empresas_sample.csv";
    let n = write_companies(&mut rng, companies_path).expect("Failed to write company sample");
    println!("Wrote {n} company-years to {companies_path}");
    println!("Try: cargo run -- --rates {rates_path} --companies {companies_path}");
}
