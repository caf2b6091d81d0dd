//! Canned codec output in the formats the real tool prints.

/// Verbose output of a successful compress run over an 11-byte file.
pub const ENCODE_REPORT: &str = "Encoding files...
Reading file: input.txt

=== COMPRESSION STATISTICS ===
Original size: 11 bytes
Compressed size: 4 bytes
Compression ratio: 63.6364%
Shannon information: 2.91337 bits/character
Huffman average: 2.94 bits/character
Efficiency: 99.0941%

=== CHARACTER FREQUENCY TABLE ===
Nr\tChar\tFreq\tCode\t\t#bits
--------------------------------------------
0\t\\n\t1\t1100\t\t4
1\tSPC\t2\t111\t\t3
2\t'a'\t3\t0\t\t1
3\t'b'\t5\t10\t\t2

Compression completed.
Files compressed: 1
";

/// Verbose output of a successful extract run restoring two files.
pub const DECODE_REPORT: &str = "Decoding archive: input.huf
Reconstructing Huffman tree from frequency table...
Original total size: 10 bytes
Number of files: 2
Frequency table entries: 6
Compressed data: 4 bytes (29 bits)
Decoding completed successfully!
";
