use std::fs;
use std::path::PathBuf;

use adaptive_range_coder::bits::{BitReader, BitSink, BitSource, BitWriter};
use adaptive_range_coder::coder::{ArithmeticCoder, ArithmeticDecoder, EncodeRet};
use adaptive_range_coder::dictionary::adaptive::{AdaptiveConstructInfo, AdaptiveDictionary};
use adaptive_range_coder::dictionary::adaptive_a::AdaptiveADictionary;
use adaptive_range_coder::dictionary::adaptive_d::AdaptiveDDictionary;
use adaptive_range_coder::dictionary::contextual::{
    AdaptiveAContextualDictionary, AdaptiveAContextualDictionaryImproved,
    AdaptiveDContextualDictionary, AdaptiveDContextualDictionaryImproved,
    ContextualConstructInfo,
};
use adaptive_range_coder::dictionary::ppm::PpmConstructInfo;
use adaptive_range_coder::dictionary::ppma::PpmADictionary;
use adaptive_range_coder::dictionary::ppmd::PpmDDictionary;
use adaptive_range_coder::dictionary::uniform::UniformDictionary;
use adaptive_range_coder::esc::adaptive_a::EscAdaptiveADictionary;
use adaptive_range_coder::esc::adaptive_d::EscAdaptiveDDictionary;
use adaptive_range_coder::esc::ppm::{EscPpmADictionary, EscPpmDDictionary};
use adaptive_range_coder::esc::{EscArithmeticCoder, EscArithmeticDecoder};
use adaptive_range_coder::utils::{order0_bound_bits, words_entropy};
use adaptive_range_coder::{Dictionary, EscDictionary, WordOrd};
use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use log::info;

/// Bytes are coded as words of an alphabet of 256.
const BYTE_MAX_ORD: WordOrd = 256;
const BYTE_NUM_BITS: u32 = 8;

#[derive(Parser, Debug)]
#[command(about = "Compress files with an adaptive range coder", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Increase the verbosity of the log (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compress a file.
    Compress(FilesArgs),
    /// Decompress a file compressed with the same model parameters.
    Decompress(FilesArgs),
}

#[derive(Args, Debug)]
struct FilesArgs {
    input: PathBuf,
    output: PathBuf,

    #[clap(flatten)]
    model: ModelArgs,
}

#[derive(Args, Debug, Clone, Copy)]
struct ModelArgs {
    /// The probability model.
    #[arg(short, long, value_enum, default_value_t = Model::Ppmd)]
    model: Model,

    /// Context length of the contextual and PPM models.
    #[arg(long, default_value_t = 2)]
    ctx_length: usize,

    /// Weight of the real counts in the ratio model.
    #[arg(long, default_value_t = 4)]
    ratio: u64,

    /// Bits of every context cell of the contextual models.
    #[arg(long, default_value_t = 8)]
    cell_bits: u32,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum Model {
    Uniform,
    AdaptiveA,
    AdaptiveD,
    Ratio,
    ContextualA,
    ContextualD,
    ContextualAImproved,
    ContextualDImproved,
    Ppma,
    Ppmd,
    EscA,
    EscD,
    EscPpma,
    EscPpmd,
}

/// The stream starts with three big-endian `u64`: the number of bytes, the number of coded
/// intervals and the number of bits of the coded words.
struct Header {
    bytes_len: u64,
    words_count: u64,
    bits_encoded: u64,
}

pub fn main() -> Result<()> {
    let cli = Cli::parse();

    stderrlog::new()
        .verbosity(2 + cli.verbose as usize)
        .timestamp(stderrlog::Timestamp::Second)
        .init()?;

    match cli.command {
        Command::Compress(args) => compress(&args),
        Command::Decompress(args) => decompress(&args),
    }
}

fn compress(args: &FilesArgs) -> Result<()> {
    let input = fs::read(&args.input)
        .with_context(|| format!("Could not read {}", args.input.display()))?;
    let ords = input.iter().map(|&byte| byte as WordOrd).collect::<Vec<_>>();

    let m = args.model;
    let output = match m.model {
        Model::Uniform => encode(&ords, UniformDictionary::new(BYTE_MAX_ORD))?,
        Model::AdaptiveA => encode(&ords, AdaptiveADictionary::new(BYTE_MAX_ORD))?,
        Model::AdaptiveD => encode(&ords, AdaptiveDDictionary::new(BYTE_MAX_ORD))?,
        Model::Ratio => encode(&ords, AdaptiveDictionary::new(m.ratio_info())?)?,
        Model::ContextualA => encode(&ords, AdaptiveAContextualDictionary::new(m.ctx_info())?)?,
        Model::ContextualD => encode(&ords, AdaptiveDContextualDictionary::new(m.ctx_info())?)?,
        Model::ContextualAImproved => {
            encode(&ords, AdaptiveAContextualDictionaryImproved::new(m.ctx_info())?)?
        }
        Model::ContextualDImproved => {
            encode(&ords, AdaptiveDContextualDictionaryImproved::new(m.ctx_info())?)?
        }
        Model::Ppma => encode(&ords, PpmADictionary::new(m.ppm_info())?)?,
        Model::Ppmd => encode(&ords, PpmDDictionary::new(m.ppm_info())?)?,
        Model::EscA => encode_esc(&ords, EscAdaptiveADictionary::new(BYTE_MAX_ORD))?,
        Model::EscD => encode_esc(&ords, EscAdaptiveDDictionary::new(BYTE_MAX_ORD))?,
        Model::EscPpma => encode_esc(&ords, EscPpmADictionary::new(m.ppm_info())?)?,
        Model::EscPpmd => encode_esc(&ords, EscPpmDDictionary::new(m.ppm_info())?)?,
    };

    info!("Model: {:?}", m);
    info!("Input: {} bytes", input.len());
    info!(
        "Order-0 entropy: {:.3} bits per byte ({:.0} bits)",
        words_entropy(&ords),
        order0_bound_bits(&ords)
    );
    info!(
        "Output: {} bytes, {:.3} bits per byte",
        output.len(),
        output.len() as f64 * 8.0 / input.len().max(1) as f64
    );

    fs::write(&args.output, output)
        .with_context(|| format!("Could not write {}", args.output.display()))
}

fn decompress(args: &FilesArgs) -> Result<()> {
    let input = fs::read(&args.input)
        .with_context(|| format!("Could not read {}", args.input.display()))?;
    let mut source = BitReader::new(&input);
    let header = Header {
        bytes_len: source.take_u64(),
        words_count: source.take_u64(),
        bits_encoded: source.take_u64(),
    };

    let m = args.model;
    let ords = match m.model {
        Model::Uniform => decode(source, &header, UniformDictionary::new(BYTE_MAX_ORD))?,
        Model::AdaptiveA => decode(source, &header, AdaptiveADictionary::new(BYTE_MAX_ORD))?,
        Model::AdaptiveD => decode(source, &header, AdaptiveDDictionary::new(BYTE_MAX_ORD))?,
        Model::Ratio => decode(source, &header, AdaptiveDictionary::new(m.ratio_info())?)?,
        Model::ContextualA => {
            decode(source, &header, AdaptiveAContextualDictionary::new(m.ctx_info())?)?
        }
        Model::ContextualD => {
            decode(source, &header, AdaptiveDContextualDictionary::new(m.ctx_info())?)?
        }
        Model::ContextualAImproved => decode(
            source,
            &header,
            AdaptiveAContextualDictionaryImproved::new(m.ctx_info())?,
        )?,
        Model::ContextualDImproved => decode(
            source,
            &header,
            AdaptiveDContextualDictionaryImproved::new(m.ctx_info())?,
        )?,
        Model::Ppma => decode(source, &header, PpmADictionary::new(m.ppm_info())?)?,
        Model::Ppmd => decode(source, &header, PpmDDictionary::new(m.ppm_info())?)?,
        Model::EscA => decode_esc(source, &header, EscAdaptiveADictionary::new(BYTE_MAX_ORD))?,
        Model::EscD => decode_esc(source, &header, EscAdaptiveDDictionary::new(BYTE_MAX_ORD))?,
        Model::EscPpma => decode_esc(source, &header, EscPpmADictionary::new(m.ppm_info())?)?,
        Model::EscPpmd => decode_esc(source, &header, EscPpmDDictionary::new(m.ppm_info())?)?,
    };

    anyhow::ensure!(
        ords.len() as u64 == header.bytes_len,
        "Decoded {} bytes instead of {}",
        ords.len(),
        header.bytes_len
    );
    let output = ords
        .into_iter()
        .map(|ord| u8::try_from(ord).context("Decoded a word outside of the byte range"))
        .collect::<Result<Vec<_>>>()?;

    info!("Decoded {} bytes", output.len());
    fs::write(&args.output, output)
        .with_context(|| format!("Could not write {}", args.output.display()))
}

impl ModelArgs {
    fn ratio_info(&self) -> AdaptiveConstructInfo {
        AdaptiveConstructInfo {
            max_ord: BYTE_MAX_ORD,
            ratio: self.ratio,
        }
    }

    fn ctx_info(&self) -> ContextualConstructInfo {
        ContextualConstructInfo::new(BYTE_NUM_BITS, self.ctx_length, self.cell_bits)
    }

    fn ppm_info(&self) -> PpmConstructInfo {
        PpmConstructInfo::new(BYTE_MAX_ORD, self.ctx_length)
    }
}

/// Fills in the header reserved at `offset` and returns the whole stream.
fn with_header(ret: EncodeRet<BitWriter>, bytes_len: usize, offset: usize) -> Vec<u8> {
    let mut sink = ret.sink;
    sink.write_u64_at(offset, bytes_len as u64);
    sink.write_u64_at(offset + 64, ret.words_count as u64);
    sink.write_u64_at(offset + 128, ret.bits_encoded as u64);
    sink.into_bytes()
}

fn reserve_header(sink: &mut BitWriter) -> usize {
    let offset = sink.reserve_u64();
    sink.reserve_u64();
    sink.reserve_u64();
    offset
}

fn encode<D: Dictionary>(ords: &[WordOrd], mut dict: D) -> Result<Vec<u8>> {
    let mut coder = ArithmeticCoder::<D::Count>::new();
    let offset = reserve_header(coder.sink_mut());
    coder.encode(ords.iter().copied(), &mut dict)?;
    Ok(with_header(coder.finalize(), ords.len(), offset))
}

fn encode_esc<D: EscDictionary>(ords: &[WordOrd], mut dict: D) -> Result<Vec<u8>> {
    let mut coder = EscArithmeticCoder::<D::Count>::new();
    let offset = reserve_header(coder.sink_mut());
    coder.encode(ords.iter().copied(), &mut dict)?;
    Ok(with_header(coder.finalize(), ords.len(), offset))
}

fn decode<D: Dictionary>(source: BitReader, header: &Header, mut dict: D) -> Result<Vec<WordOrd>> {
    let mut decoder = ArithmeticDecoder::<D::Count, _>::new(source, header.bits_encoded as usize);
    decoder.decode(&mut dict, header.words_count as usize)
}

fn decode_esc<D: EscDictionary>(
    source: BitReader,
    header: &Header,
    mut dict: D,
) -> Result<Vec<WordOrd>> {
    let mut decoder =
        EscArithmeticDecoder::<D, _>::new(source, header.bits_encoded as usize);
    decoder.decode(&mut dict, header.words_count as usize)
}
