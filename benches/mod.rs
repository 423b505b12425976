/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 18/10/26
******************************************************************************/

use criterion::{criterion_group, criterion_main};

mod admission_bench;

criterion_group!(benches, admission_bench::register_benchmarks);
criterion_main!(benches);
