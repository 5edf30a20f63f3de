/*
Copyright 2025 the hwsnap authors

Licensed under the Apache License, Version 2.0 (the "License");
you may not use this file except in compliance with the License.
You may obtain a copy of the License at

    http://www.apache.org/licenses/LICENSE-2.0

Unless required by applicable law or agreed to in writing, software
distributed under the License is distributed on an "AS IS" BASIS,
WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
See the License for the specific language governing permissions and
limitations under the License.
*/

use clap::{Parser, ValueEnum};
use serde_json::Value;

use hwsnap::platform_assembler;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Category {
    Motherboard,
    Cpu,
    Ram,
    Disks,
    Gpus,
    Display,
    Tpm,
    Bluetooth,
    Wifi,
}

/// Collect a hardware snapshot and print it as JSON.
#[derive(Debug, Parser)]
#[command(name = "hwsnap", version, about)]
struct Opt {
    /// Collect a single category instead of the full snapshot
    #[arg(short, long, value_enum)]
    category: Option<Category>,

    /// Pretty-print the JSON output
    #[arg(short, long)]
    pretty: bool,
}

// The instrumentation handle is thread-bound and probes run sequentially
// anyway, so a current-thread runtime is all the binary needs.
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let opt = Opt::parse();

    let assembler = platform_assembler();
    let value: Value = match opt.category {
        None => serde_json::to_value(assembler.collect().await)?,
        Some(Category::Motherboard) => serde_json::to_value(assembler.motherboard().await)?,
        Some(Category::Cpu) => serde_json::to_value(assembler.cpu().await)?,
        Some(Category::Ram) => serde_json::to_value(assembler.ram().await)?,
        Some(Category::Disks) => serde_json::to_value(assembler.disks().await)?,
        Some(Category::Gpus) => serde_json::to_value(assembler.gpus().await)?,
        Some(Category::Display) => serde_json::to_value(assembler.display().await)?,
        Some(Category::Tpm) => serde_json::to_value(assembler.tpm().await)?,
        Some(Category::Bluetooth) => serde_json::to_value(assembler.bluetooth().await)?,
        Some(Category::Wifi) => serde_json::to_value(assembler.wifi().await)?,
    };

    let rendered = if opt.pretty {
        serde_json::to_string_pretty(&value)?
    } else {
        serde_json::to_string(&value)?
    };
    println!("{rendered}");
    Ok(())
}
