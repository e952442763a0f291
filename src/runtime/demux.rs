//! Parses the Docker daemon's multiplexed log stream (one 8-byte header
//! per record, stream discriminator in bytes 0-3 ignored, payload length
//! as big-endian u32 in bytes 4-7) into a single concatenated byte
//! sequence. Tolerates a truncated final record.

pub fn demux_docker_logs(data: &[u8]) -> Vec<u8> {
  let mut output = Vec::with_capacity(data.len());
  let mut offset = 0usize;
  while offset + 8 <= data.len() {
    let size = u32::from_be_bytes([
      data[offset + 4],
      data[offset + 5],
      data[offset + 6],
      data[offset + 7],
    ]) as usize;
    offset += 8;
    let end = (offset + size).min(data.len());
    output.extend_from_slice(&data[offset..end]);
    offset = end;
  }
  output
}
