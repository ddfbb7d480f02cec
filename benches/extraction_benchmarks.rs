//! Performance benchmarks for the payroll import engine.
//!
//! Covers the two hot paths of an import run:
//! - Extracting a payroll statement with 1, 50 and 500 employee blocks
//! - Reconciling a 500-employee extraction into an in-memory store
//!
//! Run with: `cargo bench`
//! HTML reports are generated in `target/criterion/`

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};

use payroll_import::config::{Calendar, PolicyConfig};
use payroll_import::extraction::{Extractor, PeriodResolver, RecordingSink};
use payroll_import::models::RawDocument;
use payroll_import::store::{Reconciler, SqliteStore};

/// Builds a monthly statement text with `employees` blocks and a trailer.
fn create_statement(employees: usize) -> String {
    let mut text = String::from("FOLHA DE PAGAMENTO\nMês/Ano: 03/2026\n");
    for i in 0..employees {
        text.push_str(&format!(
            "Funcionário: {} - COLABORADOR {:04} Adm: 01/02/2020\n\
             Função: AUXILIAR\n\
             Salário Base: 2.200,00\n\
             00009 HORA EXTRA 050% 0{}:30\n\
             INSS 9,00% 198,00\n\
             Total de Vencimentos: 2.350,00\n\
             Líquido a Receber: 2.152,00\n",
            1000 + i,
            i,
            i % 10
        ));
    }
    text.push_str("Total de Vencimentos 1.000,00 Total de Descontos 100,00 Total Líquido 900,00\n");
    text
}

fn create_extractor() -> Extractor {
    Extractor::with_resolver(
        PolicyConfig::default(),
        PeriodResolver::new(Calendar::default(), 2026),
    )
}

/// Benchmark: statement extraction by employee count.
fn bench_extract_statement(c: &mut Criterion) {
    let extractor = create_extractor();
    let mut group = c.benchmark_group("extract_statement");

    for employees in [1usize, 50, 500] {
        let document = RawDocument::from_text("Folha Mensal 03.26.pdf", create_statement(employees));
        group.throughput(Throughput::Elements(employees as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(employees),
            &document,
            |b, document| {
                b.iter(|| {
                    let sink = RecordingSink::new();
                    black_box(extractor.extract("folha.json", document, &sink))
                })
            },
        );
    }

    group.finish();
}

/// Benchmark: reconciling a 500-employee document, inserts then updates.
fn bench_reconcile(c: &mut Criterion) {
    let extractor = create_extractor();
    let document = RawDocument::from_text("Folha Mensal 03.26.pdf", create_statement(500));
    let sink = RecordingSink::new();
    let extraction = extractor.extract("folha.json", &document, &sink);

    let mut store = SqliteStore::open_in_memory().unwrap();
    store.ensure_schema().unwrap();

    let mut group = c.benchmark_group("reconcile");
    group.throughput(Throughput::Elements(extraction.employees.len() as u64));
    group.bench_function("500_employees", |b| {
        b.iter(|| {
            let sink = RecordingSink::new();
            let mut reconciler = Reconciler::new(&mut store, &sink);
            black_box(reconciler.reconcile(&extraction, false).unwrap())
        })
    });
    group.finish();
}

criterion_group!(benches, bench_extract_statement, bench_reconcile);
criterion_main!(benches);
