//! Sources vidéo de tvp : probe ffprobe et décodage ffmpeg en RGB24 brut.

pub mod video;
