pub mod abg;
pub mod bode;
pub mod brock;
pub mod bronchodilation;
pub mod cat;
pub mod curb65;
pub mod fleischner;
pub mod geneva;
pub mod light;
pub mod lung_resection;
pub mod mayo;
pub mod mmrc;
pub mod oxygenation;
pub mod pesi;
pub mod psi;
pub mod resect90;
pub mod spirometry;
pub mod steroid;
pub mod stopbang;
pub mod tnm;
